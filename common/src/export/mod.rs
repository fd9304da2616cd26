//! Núcleo de exportación compartido por los escritores PDF y Excel.

pub mod pdf_core;

#[cfg(feature = "excel")]
pub mod excel_core;
