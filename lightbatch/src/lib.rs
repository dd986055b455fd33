pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    engine_from_args, load_budgets, load_sites, load_urls_from_file, parse_site_line, parse_threshold,
    sites_file_from_args, split_params,
};

pub use commands::command_argument_builder;
