pub mod paths;

pub use paths::{
    APP_DIR_NAME, default_config_path, default_log_path, format_path_with_tilde,
    validate_file_size,
};
