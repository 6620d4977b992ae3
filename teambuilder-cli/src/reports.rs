use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use teambuilder_core::{Character, Resolution, StatKind, TeamSummary, group_display_name};

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    characters: &[&Character],
    total: usize,
) -> Result<()> {
    writeln!(writer, "{}", "🦸 Roster".bright_cyan().bold())?;
    writeln!(writer, "{}", "=========".cyan())?;
    writeln!(writer, "Showing {} of {total} characters", characters.len())?;
    writeln!(writer)?;

    for character in characters {
        let kind = if character.kind.is_dual_mode() {
            character.kind.label().red()
        } else {
            character.kind.label().green()
        };
        writeln!(writer, "{} [{}]", character.name.bold(), kind)?;
        writeln!(writer, "   id: {}", character.id)?;
        if let Some(set) = &character.set {
            writeln!(writer, "   set: {set}")?;
        }
        if !character.groups.is_empty() {
            let groups: Vec<String> = character
                .groups
                .iter()
                .map(|g| group_display_name(g))
                .collect();
            writeln!(writer, "   groups: {}", groups.join(", "))?;
        }
        writeln!(writer, "   {}", stat_line(character))?;
        writeln!(writer, "   portrait: {}", character.image_url.dimmed())?;
    }
    Ok(())
}

fn stat_line(character: &Character) -> String {
    StatKind::ALL
        .iter()
        .map(|kind| format!("{} {}", kind.label(), character.stat(*kind)))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn generate_json_report<W: Write + ?Sized>(
    writer: &mut W,
    characters: &[&Character],
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(characters)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    characters: &[&Character],
) -> Result<()> {
    writeln!(writer, "# Team Builder Roster\n")?;
    writeln!(writer, "- **Characters**: {}\n", characters.len())?;
    writeln!(
        writer,
        "| Name | Type | Set | Groups | Wild | Heroic | Attacks | Movements |"
    )?;
    writeln!(writer, "|---|---|---|---|---|---|---|---|")?;
    for character in characters {
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            character.name,
            character.kind.label(),
            character.set.as_deref().unwrap_or("-"),
            character.groups.join(", "),
            character.stat(StatKind::Wild),
            character.stat(StatKind::Heroic),
            character.stat(StatKind::Attack),
            character.stat(StatKind::Movement),
        )?;
    }
    Ok(())
}

pub fn generate_csv_report<W: Write>(writer: W, characters: &[&Character]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "id",
        "name",
        "type",
        "set",
        "groups",
        "wild",
        "heroic",
        "attacks",
        "movements",
        "image_url",
    ])?;
    for character in characters {
        let stats = StatKind::ALL.map(|kind| character.stat(kind).to_string());
        csv.write_record([
            character.id.as_str(),
            character.name.as_str(),
            character.kind.label(),
            character.set.as_deref().unwrap_or_default(),
            &character.groups.join(", "),
            &stats[0],
            &stats[1],
            &stats[2],
            &stats[3],
            character.image_url.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn generate_team_report<W: Write + ?Sized>(
    writer: &mut W,
    team: &[&Character],
    summary: &TeamSummary,
) -> Result<()> {
    writeln!(writer, "{}", "🛡️  Team".bright_yellow().bold())?;
    for character in team {
        writeln!(writer, "  • {} ({})", character.name.bold(), character.id)?;
    }
    writeln!(writer)?;
    for kind in StatKind::ALL {
        let totals = summary.get(kind);
        writeln!(
            writer,
            "  {:<10} total {:>3}  avg {:.1}",
            kind.label(),
            totals.total,
            totals.average
        )?;
    }
    Ok(())
}

pub fn generate_resolution_report<W: Write + ?Sized>(
    writer: &mut W,
    name: &str,
    resolution: &Resolution,
) -> Result<()> {
    if resolution.is_fallback() {
        writeln!(writer, "❌ {} → {}", name.bold(), resolution.image_url.yellow())?;
        if let Some(diagnostic) = &resolution.diagnostic {
            writeln!(writer, "   {}", diagnostic.dimmed())?;
        }
    } else {
        writeln!(writer, "✅ {} → {}", name.bold(), resolution.image_url.green())?;
        writeln!(writer, "   rule: {:?}", resolution.rule)?;
    }
    Ok(())
}
