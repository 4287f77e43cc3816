use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Vizwalk catalog command line arguments
#[derive(Parser, Debug)]
#[command(name = "vizwalk", author, version, about = "Vizwalk project catalog", long_about = None)]
pub(crate) struct Cli {
    /// TOML file with catalog settings
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Keep the catalog in one JSON file (host storage)
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "store_dir")]
    pub(crate) data_file: Option<PathBuf>,

    /// Keep the catalog in a key/value directory (browser-style storage)
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) store_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub(crate) log_json: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Print the catalog grouped by category
    List {
        /// Search text (case, underscores and spacing ignored)
        #[arg(long, short, default_value = "")]
        query: String,
    },
    /// Add a project
    Add(AddArgs),
    /// Remove every project
    Clear,
    /// Print the experience launch target for a project
    Launch {
        slot_id: String,
        /// Run as the privileged host shell
        #[arg(long)]
        privileged: bool,
    },
    /// Print the gallery route for a project
    Gallery { slot_id: String },
    /// Print one project with its display and media links
    Show {
        slot_id: String,
        #[arg(long)]
        privileged: bool,
    },
    /// Resolve a stored reference for display
    Resolve {
        reference: String,
        #[arg(long)]
        privileged: bool,
    },
    /// Format an area for display
    FormatArea { text: String },
}

#[derive(Args, Debug)]
pub(crate) struct AddArgs {
    #[arg(long)]
    pub(crate) project_name: String,
    #[arg(long)]
    pub(crate) build_name: String,
    /// Defaults to the configured category
    #[arg(long)]
    pub(crate) category: Option<String>,
    #[arg(long)]
    pub(crate) build_version: Option<String>,
    #[arg(long, default_value = "")]
    pub(crate) area_sqft: String,
    #[arg(long, default_value = "")]
    pub(crate) industry: String,
    #[arg(long, default_value = "")]
    pub(crate) design_style: String,
    #[arg(long = "thumb", default_value = "")]
    pub(crate) thumbnail_ref: String,
    #[arg(long = "video", default_value = "")]
    pub(crate) video_ref: String,
    #[arg(long = "viewer-id", default_value = "")]
    pub(crate) external_viewer_id: String,
    /// URL, relative route or local executable path
    #[arg(long = "url", default_value = "")]
    pub(crate) launch_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_global_storage_flag() {
        let cli = Cli::parse_from([
            "vizwalk",
            "add",
            "--project-name",
            "Tower",
            "--build-name",
            "Lobby",
            "--url",
            "https://walks.example.com/tower",
            "--data-file",
            "catalog.json",
        ]);
        assert_eq!(cli.data_file, Some(PathBuf::from("catalog.json")));
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.project_name, "Tower");
        assert_eq!(args.launch_ref, "https://walks.example.com/tower");
        assert_eq!(args.category, None);
    }

    #[test]
    fn storage_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "vizwalk",
            "--data-file",
            "a.json",
            "--store-dir",
            "store",
            "clear",
        ]);
        assert!(parsed.is_err());
    }
}
