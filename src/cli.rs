use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "lector",
    version,
    about = "A terminal speed reader that flashes one word at a time.",
    long_about = None
)]
pub struct Cli {
    /// Print the library with reading progress
    #[clap(short = 'r', long)]
    pub history: bool,

    /// Print the words of a document with their pivot letter, then exit
    #[clap(short, long, value_name = "FILE")]
    pub dump: Option<PathBuf>,

    /// Remove a reading from the library
    #[clap(long, value_name = "ID")]
    pub delete: Option<String>,

    /// List the stories available in the remote catalog
    #[clap(long)]
    pub catalog: bool,

    /// Download a catalog story into the library
    #[clap(long, value_name = "PATH")]
    pub fetch: Option<String>,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,

    /// Text or PDF file to open
    #[clap(name = "FILE")]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_and_flags() {
        let cli = Cli::parse_from(["lector", "-vv", "--debug", "book.txt"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.debug);
        assert_eq!(cli.file, Some(PathBuf::from("book.txt")));
        assert!(!cli.history);
    }

    #[test]
    fn test_parse_dump_takes_a_value() {
        let cli = Cli::parse_from(["lector", "-d", "notes.txt"]);
        assert_eq!(cli.dump, Some(PathBuf::from("notes.txt")));
        assert_eq!(cli.file, None);
    }

    #[test]
    fn test_parse_catalog_commands() {
        let cli = Cli::parse_from(["lector", "--fetch", "datos/cuento.txt", "--delete", "abc"]);
        assert_eq!(cli.fetch.as_deref(), Some("datos/cuento.txt"));
        assert_eq!(cli.delete.as_deref(), Some("abc"));
        assert!(!cli.catalog);
    }
}
