//! File actions module.
//!
//! Copies confirmed by the resolver are removed here, either permanently
//! (default) or by moving them to the system trash.
//!
//! ```no_run
//! use dupsweep::actions::{delete_file, DeleteConfig};
//! use std::path::Path;
//!
//! let result = delete_file(Path::new("/path/to/copy.txt"), &DeleteConfig::default());
//! ```

pub mod delete;

pub use delete::{
    delete_file, delete_to_trash, permanent_delete, BatchDeleteResult, DeleteConfig, DeleteError,
    DeleteResult,
};
