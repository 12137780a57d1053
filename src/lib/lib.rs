//!
//! memer  -- Memes from links
//!

#[macro_use] extern crate enum_derive;
             extern crate image;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
#[macro_use] extern crate macro_attr;
             extern crate reqwest;
             extern crate serde;
#[macro_use] extern crate serde_derive;
             extern crate serde_json;
             extern crate url;


#[cfg(test)]              extern crate proptest;
#[cfg(test)]              extern crate spectral;


mod meme;
mod model;
mod remote;
mod resolve;
mod util;


pub use meme::*;
pub use model::*;
pub use remote::*;
pub use resolve::*;
