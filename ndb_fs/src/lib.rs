#![cfg_attr(docsrs, feature(doc_cfg))]

//! File access utilities
//! 文件访问工具

mod fs;
mod reader;

pub use fs::open_read;
pub use reader::FileReader;
