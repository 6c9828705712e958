/// UI module exports

pub mod boundary;
pub mod popup;
