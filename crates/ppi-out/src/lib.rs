//! PPI Out: turns extracted reports into files people look at
//!
//! - [`csv`]: the `time,word,subject,count` report format, both directions
//! - [`palette`]: five-class ColorBrewer schemes
//! - [`site`]: a static page rendered with Handlebars
//!
//! # Example
//!
//! ```ignore
//! use ppi_out::{write_records, write_site, SiteConfig};
//!
//! write_records(std::fs::File::create("ppi.csv")?, &records)?;
//! let config = SiteConfig::load("site.yaml".as_ref())?;
//! write_site("site".as_ref(), "ppi.csv".as_ref(), &config)?;
//! ```

pub mod csv;
pub mod error;
pub mod palette;
pub mod site;

pub use csv::{read_records, write_records};
pub use error::{RenderError, Result};
pub use site::{build_site, make_colors, write_site, SiteConfig, SiteRenderer, SubjectColors, SubjectConfig};
