// BEGIN - Embark standard lints v0.4
// do not change or add/remove here, but one can add exceptions after this section
// for more info see: <https://github.com/EmbarkStudios/rust-ecosystem/issues/59>
#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::await_holding_lock,
    clippy::char_lit_as_u8,
    clippy::checked_conversions,
    clippy::dbg_macro,
    clippy::debug_assert_with_mut_call,
    clippy::doc_markdown,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::exit,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_deref_methods,
    clippy::explicit_into_iter_loop,
    clippy::fallible_impl_from,
    clippy::filter_map_next,
    clippy::float_cmp_const,
    clippy::fn_params_excessive_bools,
    clippy::if_let_mutex,
    clippy::implicit_clone,
    clippy::imprecise_flops,
    clippy::inefficient_to_string,
    clippy::invalid_upcast_comparisons,
    clippy::large_types_passed_by_value,
    clippy::let_unit_value,
    clippy::linkedlist,
    clippy::lossy_float_literal,
    clippy::macro_use_imports,
    clippy::manual_ok_or,
    clippy::map_err_ignore,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::match_on_vec_items,
    clippy::match_same_arms,
    clippy::match_wildcard_for_single_variants,
    clippy::mem_forget,
    clippy::mismatched_target_os,
    clippy::mut_mut,
    clippy::mutex_integer,
    clippy::needless_borrow,
    clippy::needless_continue,
    clippy::option_option,
    clippy::path_buf_push_overwrite,
    clippy::ptr_as_ptr,
    clippy::ref_option_ref,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_functions_in_if_condition,
    clippy::semicolon_if_nothing_returned,
    clippy::string_add_assign,
    clippy::string_add,
    clippy::string_lit_as_bytes,
    clippy::string_to_string,
    clippy::todo,
    clippy::trait_duplication_in_bounds,
    clippy::unimplemented,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::useless_transmute,
    clippy::verbose_file_reads,
    clippy::zero_sized_map_values,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms
)]
// END - Embark standard lints v0.4

use anyhow::Result;
use clap::Parser;
use enumgen::{Codegen, DiscoveryPolicy, DuplicatePolicy, Outcome, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};
use tracing_subscriber::prelude::*;

/// Generates TypeScript enums from the `enum` declarations of every JSON
/// schema found under a directory
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, max_term_width = 80)]
struct Cli {
    /// Directory that is searched recursively for `*.json` schema files
    input_dir: PathBuf,

    /// Existing directory the generated file is written to
    output_dir: PathBuf,

    /// Name of the generated file inside of the output directory
    #[arg(long, default_value = enumgen::DEFAULT_FILE_NAME)]
    file_name: String,

    /// What to do when a directory in the input tree can't be listed.
    ///
    /// `fail-open` logs the error and processes no schemas at all, `partial`
    /// logs the error and processes the schemas that could be found.
    #[arg(long, value_enum, default_value_t)]
    discovery: DiscoveryPolicy,

    /// What to do when several enums end up with the same name
    #[arg(long, value_enum, default_value_t)]
    duplicates: DuplicatePolicy,
}

fn main() -> ExitCode {
    match std::panic::catch_unwind(real_main) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            error!("Exiting with error: {err:?}");
            ExitCode::FAILURE
        }
        Err(_) => {
            error!("Exiting with error due to a panic");
            ExitCode::FAILURE
        }
    }
}

fn setup_logger() {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_env_var("ENUMGEN_LOG")
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::env::var("COLORS").as_deref() != Ok("0"))
        .pretty();

    tracing_subscriber::registry()
        .with(fmt)
        .with(env_filter)
        .init();
}

fn real_main() -> Result<()> {
    setup_logger();

    let cli = Cli::parse();

    debug!(cli = format_args!("{cli:#?}"), "Invoked with CLI params");

    let codegen = Codegen::builder()
        .input_dir(cli.input_dir)
        .output_dir(cli.output_dir)
        .file_name(cli.file_name)
        .discovery(cli.discovery)
        .duplicates(cli.duplicates)
        .build()?;

    match codegen.run()? {
        Outcome::Written { path, enums } => info!(%path, enums, "Done"),
        Outcome::NoEnums => info!("Nothing to write"),
    }

    Ok(())
}
