//! Module implementing the actual meme making task.
//! The whole pipeline, from the link to the final image, lives here.

use std::ops::Deref;

use image::DynamicImage;

use crate::model::MemeSpec;
use crate::remote::UpstreamError;
use crate::resolve::sanitize_name;
use crate::util::imageops;
use super::engine;
use super::error::MemeError;
use super::output::MemeOutput;


/// Represents a single meme making task and contains all the relevant logic.
pub(super) struct MemeTask<'e> {
    spec: MemeSpec,
    engine: &'e engine::Inner,
}

impl<'e> Deref for MemeTask<'e> {
    type Target = MemeSpec;
    fn deref(&self) -> &Self::Target {
        &self.spec
    }
}

impl<'e> MemeTask<'e> {
    #[inline]
    pub fn new(spec: MemeSpec, engine: &'e engine::Inner) -> Self {
        MemeTask{spec, engine}
    }
}

impl<'e> MemeTask<'e> {
    /// Perform the task.
    pub fn perform(self) -> Result<MemeOutput, MemeError> {
        debug!("Making {:?}", self.spec);

        let resolved = self.engine.resolver.resolve(&self.source)
            .map_err(MemeError::Resolve)?;
        let bytes = self.engine.fetcher.fetch(resolved.direct_url())
            .map_err(MemeError::Fetch)?;
        let img = decode(resolved.direct_url(), &bytes)?;
        info!("Original image is {}x{}", img.width(), img.height());

        let background = self.prepare_background(&img)?;
        let hosted_url = self.engine.host.upload(&background)
            .map_err(MemeError::Upload)?;
        info!("Uploaded background image to {}", hosted_url);

        let meme = self.render(&hosted_url)?;
        let bytes = imageops::encode_png(&meme).map_err(MemeError::Encode)?;

        let name = match self.name {
            Some(ref name) => sanitize_name(name),
            None => resolved.suggested_name().to_owned(),
        };
        Ok(MemeOutput::new(name, meme, bytes))
    }

    /// Scale & pad the image for rendering, and encode it as PNG.
    fn prepare_background(&self, img: &DynamicImage) -> Result<Vec<u8>, MemeError> {
        let config = &self.engine.config;
        let padded = imageops::scale_and_pad(img, config.target_size, config.padding)
            .ok_or_else(|| MemeError::TooLarge(img.width(), img.height()))?;
        imageops::encode_png(&padded).map_err(MemeError::Encode)
    }

    /// Render the meme with given background and remove the padding.
    fn render(&self, background_url: &str) -> Result<DynamicImage, MemeError> {
        let meme_url = self.engine.renderer
            .meme_url(background_url, &self.top_text, &self.bottom_text)
            .map_err(MemeError::Render)?;
        debug!("Fetching rendered meme from {}", meme_url);
        let bytes = self.engine.fetcher.fetch(&meme_url).map_err(MemeError::Render)?;
        let rendered = decode(&meme_url, &bytes)?;

        let padding = self.engine.config.padding;
        imageops::crop_padding(&rendered, padding).ok_or_else(|| {
            MemeError::Render(UpstreamError::malformed(&meme_url, format!(
                "rendered image is {}px tall, which leaves nothing after cropping {}px",
                rendered.height(), 2 * padding)))
        })
    }
}

fn decode(url: &str, bytes: &[u8]) -> Result<DynamicImage, MemeError> {
    imageops::decode(bytes).map_err(|e| MemeError::Decode(url.to_owned(), e))
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
    use spectral::prelude::*;

    use crate::meme::{Engine, EngineBuilder, MemeError};
    use crate::model::MemeSpec;
    use crate::remote::{ImageFetcher, ImageHost, MemeRenderer, UpstreamError};
    use crate::resolve::{BearerToken, MediaResolver, PostReference, ResolveError, StaticToken};
    use crate::util::imageops::encode_png;

    /// Log of the calls made to all the fake services.
    type Calls = Rc<RefCell<Vec<String>>>;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
        encode_png(&DynamicImage::ImageRgb8(img)).unwrap()
    }

    /// Fetcher serving fixed content, and rendering memes by echoing the background back.
    struct FakeWeb {
        calls: Calls,
        pages: HashMap<String, Vec<u8>>,
        uploaded: Rc<RefCell<Option<Vec<u8>>>>,
    }
    impl ImageFetcher for FakeWeb {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
            self.calls.borrow_mut().push(format!("fetch {}", url));
            if url.starts_with("https://render.test/") {
                return self.uploaded.borrow().clone()
                    .ok_or_else(|| UpstreamError::Status(url.to_owned(), 404));
            }
            self.pages.get(url).cloned().ok_or_else(|| UpstreamError::Status(url.to_owned(), 404))
        }
    }

    struct FakeHost {
        calls: Calls,
        uploaded: Rc<RefCell<Option<Vec<u8>>>>,
    }
    impl ImageHost for FakeHost {
        fn upload(&self, png: &[u8]) -> Result<String, UpstreamError> {
            self.calls.borrow_mut().push("upload".into());
            *self.uploaded.borrow_mut() = Some(png.to_vec());
            Ok("https://host.test/bg.png".into())
        }
    }

    struct FakeRenderer;
    impl MemeRenderer for FakeRenderer {
        fn meme_url(&self, background: &str,
                    top_text: &str, bottom_text: &str) -> Result<String, UpstreamError> {
            Ok(format!("https://render.test/{}/{}?bg={}", top_text, bottom_text, background))
        }
    }

    struct FakeMedia(Vec<String>);
    impl MediaResolver for FakeMedia {
        fn attachment_urls(&self, _: &PostReference,
                           _: &BearerToken) -> Result<Vec<String>, UpstreamError> {
            Ok(self.0.clone())
        }
    }

    fn engine(pages: Vec<(&str, Vec<u8>)>) -> (Engine, Calls) {
        let calls = Calls::default();
        let uploaded = Rc::new(RefCell::new(None));
        let web = FakeWeb{
            calls: calls.clone(),
            pages: pages.into_iter().map(|(u, b)| (u.to_owned(), b)).collect(),
            uploaded: uploaded.clone(),
        };
        let engine = EngineBuilder::new()
            .credentials(StaticToken::new("token"))
            .media_resolver(FakeMedia(vec!["https://pbs.twimg.com/media/a.jpg".into()]))
            .fetcher(web)
            .image_host(FakeHost{calls: calls.clone(), uploaded})
            .renderer(FakeRenderer)
            .build().unwrap();
        (engine, calls)
    }

    #[test]
    fn direct_image() {
        let (engine, calls) = engine(vec![("https://example.com/doge.png", png(40, 20))]);
        let output = engine.meme(MemeSpec::new("https://example.com/doge.png")).unwrap();

        assert_eq!("doge", output.name());
        // 2:1 image is scaled to 570px of height, then padded and cropped again
        assert_eq!((1140, 570), output.dimensions());
        assert_eq!(&[0x89, b'P', b'N', b'G'], &output.bytes()[..4]);
        assert_eq!(vec![
            "fetch https://example.com/doge.png".to_owned(),
            "upload".to_owned(),
            "fetch https://render.test/ /wow??bg=https://host.test/bg.png".to_owned(),
        ], *calls.borrow());
    }

    #[test]
    fn uploaded_image_is_padded() {
        let (engine, _) = engine(vec![("https://example.com/a.png", png(300, 600))]);
        let output = engine.meme(MemeSpec::new("https://example.com/a.png")).unwrap();
        // the fake renderer echoes the padded image, so cropping recovers the scaled one
        assert_eq!((600, 1200), output.image().dimensions());
        assert_eq!([10, 20, 30], output.image().to_rgb8().get_pixel(0, 0).0);
    }

    #[test]
    fn tweet_name_and_override() {
        let (engine, _) = engine(vec![("https://pbs.twimg.com/media/a.jpg", png(10, 10))]);
        let output = engine.meme(MemeSpec::new("https://twitter.com/alice/status/12345")).unwrap();
        assert_eq!("alice_twitter_12345_0", output.name());

        let mut spec = MemeSpec::new("https://twitter.com/alice/status/12345");
        spec.name = Some("my/meme?".into());
        let output = engine.meme(spec).unwrap();
        assert_eq!("mymeme", output.name());
    }

    #[test]
    fn unrecognized_link_makes_no_calls() {
        let (engine, calls) = engine(vec![]);
        let result = engine.meme(MemeSpec::new("https://example.com/notanimage"));
        assert_that!(matches!(result, Err(MemeError::Resolve(ResolveError::UnrecognizedLink(_)))))
            .is_true();
        assert_that!(*calls.borrow()).is_empty();
    }

    #[test]
    fn fetch_failure() {
        let (engine, calls) = engine(vec![]);
        let result = engine.meme(MemeSpec::new("https://example.com/gone.png"));
        assert_that!(matches!(result, Err(MemeError::Fetch(UpstreamError::Status(_, 404)))))
            .is_true();
        assert_eq!(1, calls.borrow().len());
    }

    #[test]
    fn garbage_image() {
        let (engine, calls) = engine(vec![("https://example.com/x.png", b"<html>".to_vec())]);
        let result = engine.meme(MemeSpec::new("https://example.com/x.png"));
        match result {
            Err(MemeError::Decode(ref url, _)) => assert_eq!("https://example.com/x.png", url),
            other => panic!("unexpected result: {:?}", other.map(|o| o.name().to_owned())),
        }
        assert_that!(calls.borrow().iter().any(|c| c == "upload")).is_false();
    }

    #[test]
    fn sliver_image_too_large() {
        let (engine, calls) = engine(vec![("https://example.com/sliver.png", png(1, 10_000))]);
        let result = engine.meme(MemeSpec::new("https://example.com/sliver.png"));
        match result {
            Err(ref e @ MemeError::TooLarge(1, 10_000)) => assert_eq!("scale", e.stage()),
            other => panic!("unexpected result: {:?}", other.map(|o| o.name().to_owned())),
        }
        assert_that!(calls.borrow().iter().any(|c| c == "upload")).is_false();
    }

    #[test]
    fn render_too_small_to_crop() {
        struct TinyRender;
        impl ImageFetcher for TinyRender {
            fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
                Ok(if url.starts_with("https://render.test/") { png(10, 30) } else { png(10, 10) })
            }
        }
        let engine = EngineBuilder::new()
            .fetcher(TinyRender)
            .image_host(FakeHost{calls: Calls::default(), uploaded: Default::default()})
            .renderer(FakeRenderer)
            .build().unwrap();
        let result = engine.meme(MemeSpec::new("https://example.com/x.png"));
        assert_that!(matches!(result, Err(MemeError::Render(UpstreamError::Malformed(..)))))
            .is_true();
    }
}
