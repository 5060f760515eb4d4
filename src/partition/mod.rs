//! Partition Module
//!
//! One partition per UTC calendar date.
//!
//! ## File Layout
//! ```text
//! {data_dir}/
//!   ├── data_2024-05-01.txt     (one JSON record per line)
//!   ├── data_2024-05-02.txt
//!   └── data_2024-05-02.txt.tmp (only while a delete is rewriting)
//! ```

mod naming;

pub use naming::{
    format_date, parse_date, parse_file_name, path_for, temp_path_for, today, ParsedName,
    DATE_FORMAT, FILE_PREFIX, FILE_SUFFIX,
};
