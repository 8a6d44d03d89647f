//! Command-line interface

pub mod commands;

pub use commands::{
    cmd_config_set, cmd_config_show, cmd_distribute, cmd_recommend, cmd_reset, cmd_score, cmd_sign,
    cmd_summary, cmd_validate, AppState, CliResult,
};
