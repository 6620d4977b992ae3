mod reports;
mod server;
mod source;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use server::AppState;
use source::FsDataSource;
use teambuilder_core::team_code::is_valid_id;
use teambuilder_core::{
    CharacterType, FilterCriteria, PortraitConfig, PortraitQuery, Roster, RosterLoader, SortKey,
    SortOrder, StatKind, TeamSummary, apply_filters, decode_team_code, encode_team_code,
    partition_ids,
};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Plays on the hero side only
    Hero,
    /// Dual mode or anti-hero card
    Dual,
}

impl From<KindArg> for CharacterType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Hero => Self::Hero,
            KindArg::Dual => Self::DualModeAntiHero,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "teambuilder", version)]
#[command(about = "Browse the hero roster, check portrait matches and share team codes")]
struct Args {
    /// Roster sheet (.xlsx, .csv or .json)
    #[arg(long, global = true, default_value = "public/db/United DB.xlsx")]
    sheet: PathBuf,

    /// Directory holding the portrait images
    #[arg(long, global = true, default_value = "public/portraits")]
    portraits: PathBuf,

    /// JSON file overriding the portrait matching configuration
    #[arg(long, global = true)]
    portrait_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the roster as JSON over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// List the roster, filtered and sorted
    Roster(RosterArgs),
    /// Show which portrait a name resolves to, and why
    Resolve {
        name: String,

        #[arg(long = "type", value_enum, default_value_t = KindArg::Hero)]
        kind: KindArg,

        /// Set label, e.g. "Set 29"
        #[arg(long)]
        set: Option<String>,
    },
    /// Encode or decode shareable team codes
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },
}

#[derive(Debug, clap::Args)]
struct RosterArgs {
    /// Only characters from this set
    #[arg(long)]
    set: Option<String>,

    /// Groups to match (comma-separated, any of)
    #[arg(long)]
    groups: Option<String>,

    #[arg(long, default_value_t = 0)]
    min_wild: u32,

    #[arg(long, default_value_t = 0)]
    min_heroic: u32,

    #[arg(long, default_value_t = 0)]
    min_attack: u32,

    #[arg(long, default_value_t = 0)]
    min_movement: u32,

    /// none, alphabetical, wild, heroic, attack or movement
    #[arg(long, default_value = "none")]
    sort: SortKey,

    /// asc or desc
    #[arg(long, default_value = "asc")]
    order: SortOrder,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl RosterArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria {
            set: self.set.clone(),
            groups: self.groups.as_deref().map(split_csv).unwrap_or_default(),
            sort: self.sort,
            order: self.order,
            ..FilterCriteria::default()
        };
        for (kind, min) in [
            (StatKind::Wild, self.min_wild),
            (StatKind::Heroic, self.min_heroic),
            (StatKind::Attack, self.min_attack),
            (StatKind::Movement, self.min_movement),
        ] {
            criteria.set_min_stat(kind, min);
        }
        criteria
    }
}

#[derive(Debug, Subcommand)]
enum TeamAction {
    /// Encode character ids into a team code
    Encode {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Decode a team code into its ids
    Decode {
        code: String,

        /// Resolve the ids against the roster and print the team summary
        #[arg(long)]
        check: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match &args.command {
        Command::Serve { addr } => {
            let roster = build_loader(&args)?.load();
            if roster.is_empty() {
                log::warn!("serving an empty roster from {}", args.sheet.display());
            }
            server::serve(*addr, Arc::new(AppState::new(Arc::new(roster)))).await
        }
        Command::Roster(roster_args) => {
            let roster = load_roster(&args)?;
            write_roster(&roster, roster_args)
        }
        Command::Resolve { name, kind, set } => {
            let resolver = build_loader(&args)?.resolver();
            let query = PortraitQuery::new(name, (*kind).into()).with_set(set.as_deref());
            let resolution = resolver.resolve(&query);
            let mut out = stdout().lock();
            reports::generate_resolution_report(&mut out, name, &resolution)?;
            Ok(())
        }
        Command::Team { action } => run_team(&args, action),
    }
}

fn load_portrait_config(path: Option<&Path>) -> Result<PortraitConfig> {
    let Some(path) = path else {
        return Ok(PortraitConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    PortraitConfig::from_json(&json)
        .with_context(|| format!("invalid portrait config {}", path.display()))
}

fn build_loader(args: &Args) -> Result<RosterLoader<FsDataSource>> {
    let config = load_portrait_config(args.portrait_config.as_deref())?;
    let source = FsDataSource::new(&args.sheet, &args.portraits);
    Ok(RosterLoader::with_config(source, config))
}

/// Command-line listings surface a bad sheet as an error instead of an empty roster.
fn load_roster(args: &Args) -> Result<Roster> {
    let loader = build_loader(args)?;
    loader
        .try_load()
        .with_context(|| format!("failed to load roster from {}", loader.source().sheet().display()))
}

fn write_roster(roster: &Roster, roster_args: &RosterArgs) -> Result<()> {
    let characters = apply_filters(roster, &roster_args.criteria());
    let mut output = ReportOutput::open(roster_args.output.clone())?;

    match roster_args.report.as_str() {
        "json" => reports::generate_json_report(&mut output, &characters)?,
        "markdown" => reports::generate_markdown_report(&mut output, &characters)?,
        "csv" => reports::generate_csv_report(&mut output, &characters)?,
        _ => reports::generate_console_report(&mut output, &characters, roster.len())?,
    }

    output.finish()
}

fn run_team(args: &Args, action: &TeamAction) -> Result<()> {
    let mut out = stdout().lock();
    match action {
        TeamAction::Encode { ids } => {
            if let Some(bad) = ids.iter().find(|id| !is_valid_id(id)) {
                bail!("`{bad}` cannot be part of a team code");
            }
            let code = encode_team_code(ids).context("team is too large to share")?;
            writeln!(out, "{code}")?;
        }
        TeamAction::Decode { code, check } => {
            let ids = decode_team_code(code).context("invalid team code")?;
            if !*check {
                for id in &ids {
                    writeln!(out, "{id}")?;
                }
                return Ok(());
            }
            let roster = load_roster(args)?;
            let outcome = partition_ids(&roster, ids);
            for id in &outcome.discarded {
                eprintln!("⚠️  Unknown character id: {}", id.yellow());
            }
            let team: Vec<_> = outcome
                .applied
                .iter()
                .filter_map(|id| roster.get(id))
                .collect();
            let summary = TeamSummary::from_characters(team.iter().copied());
            reports::generate_team_report(&mut out, &team, &summary)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Destination of a roster report: the `--output` file, or stdout.
struct ReportOutput {
    path: Option<PathBuf>,
    writer: BufWriter<Box<dyn Write>>,
}

impl ReportOutput {
    fn open(path: Option<PathBuf>) -> Result<Self> {
        let sink: Box<dyn Write> = match &path {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            ),
            None => Box::new(stdout()),
        };
        Ok(Self {
            path,
            writer: BufWriter::new(sink),
        })
    }

    /// Flush buffered report bytes, naming the file on failure.
    fn finish(mut self) -> Result<()> {
        let Some(path) = self.path.take() else {
            return Ok(self.writer.flush()?);
        };
        self.writer
            .flush()
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote roster report to {}", path.display());
        Ok(())
    }
}

impl Write for ReportOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teambuilder_core::{Character, StatBlock};

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "teambuilder-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn roster_args(argv: &[&str]) -> RosterArgs {
        let mut full = vec!["teambuilder", "roster"];
        full.extend_from_slice(argv);
        match Args::try_parse_from(full).unwrap().command {
            Command::Roster(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn roster_flags_become_criteria() {
        let args = roster_args(&[
            "--set",
            "Set 29",
            "--groups",
            "Avengers, X-Men",
            "--min-wild",
            "2",
            "--sort",
            "heroic",
            "--order",
            "desc",
        ]);
        let criteria = args.criteria();
        assert_eq!(criteria.set.as_deref(), Some("Set 29"));
        assert_eq!(criteria.groups, vec!["Avengers", "X-Men"]);
        assert_eq!(criteria.min_stat(StatKind::Wild), 2);
        assert_eq!(criteria.min_stat(StatKind::Heroic), 0);
        assert_eq!(criteria.sort, SortKey::Stat(StatKind::Heroic));
        assert_eq!(criteria.order, SortOrder::Desc);
    }

    #[test]
    fn defaults_and_rejected_values() {
        let args = roster_args(&[]);
        assert_eq!(args.criteria(), FilterCriteria::default());
        assert_eq!(args.report, "console");

        assert!(Args::try_parse_from(["teambuilder", "roster", "--report", "xml"]).is_err());
        assert!(Args::try_parse_from(["teambuilder", "roster", "--sort", "sideways"]).is_err());
        assert!(Args::try_parse_from(["teambuilder", "team", "encode"]).is_err());
    }

    #[test]
    fn resolve_takes_type_and_global_paths() {
        let args = Args::try_parse_from([
            "teambuilder",
            "resolve",
            "Venom",
            "--type",
            "dual",
            "--portraits",
            "/tmp/portraits",
        ])
        .unwrap();
        assert_eq!(args.portraits, PathBuf::from("/tmp/portraits"));
        match args.command {
            Command::Resolve { name, kind, set } => {
                assert_eq!(name, "Venom");
                assert_eq!(CharacterType::from(kind), CharacterType::DualModeAntiHero);
                assert_eq!(set, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn portrait_config_loads_from_file_or_defaults() {
        assert_eq!(load_portrait_config(None).unwrap(), PortraitConfig::default());

        let path = temp_path("config.json");
        std::fs::write(&path, r#"{"url_prefix": "/img/"}"#).unwrap();
        let config = load_portrait_config(Some(&path)).unwrap();
        assert_eq!(config.image_url("a.webp"), "/img/a.webp");

        std::fs::write(&path, r#"{"fallback_image": ""}"#).unwrap();
        let err = load_portrait_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("invalid portrait config"));

        assert!(load_portrait_config(Some(&temp_path("absent"))).is_err());
    }

    #[test]
    fn roster_report_writes_to_file() {
        let roster = Roster::new(vec![Character {
            id: "hulk-0".to_string(),
            name: "HULK".to_string(),
            variant: None,
            kind: CharacterType::Hero,
            set: None,
            groups: Default::default(),
            image_url: "/portraits/Hulk_Back.webp".to_string(),
            stats: StatBlock::new(3, 2, 1, 0),
        }]);
        let output = temp_path("report.json");
        let mut args = roster_args(&["--report", "json"]);
        args.output = Some(output.clone());
        write_roster(&roster, &args).unwrap();
        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.contains("\"id\": \"hulk-0\""));
    }

    #[test]
    fn report_output_rejects_missing_directory() {
        let path = temp_path("missing").join("nested").join("out.txt");
        let err = ReportOutput::open(Some(path)).err().unwrap();
        assert!(format!("{err:#}").contains("failed to create"));
    }

    #[test]
    fn report_output_holds_bytes_until_finished() {
        let path = temp_path("buffered.txt");
        let mut output = ReportOutput::open(Some(path.clone())).unwrap();
        write!(output, "HULK").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        output.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "HULK");
    }
}
