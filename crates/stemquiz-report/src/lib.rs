//! stemquiz-report: Result exports and HTML rendering.
//!
//! Turns a finished session into files: the CSV transcript, and an HTML
//! results page drawn through [`html::HtmlRenderer`].

pub mod csv;
pub mod html;
