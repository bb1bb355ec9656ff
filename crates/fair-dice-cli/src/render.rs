//! Plain-text rendering of the help table and the final result.

use fair_dice_core::{GameOutcome, ProbabilityTable};

const CORNER: &str = "User dice v";

/// Box-drawn matrix of win probabilities for the user's die (rows) against
/// the computer's die (columns).
pub fn probability_table(table: &ProbabilityTable) -> String {
    let headers: Vec<String> = table.dice().iter().map(ToString::to_string).collect();
    let width = headers
        .iter()
        .map(|h| h.chars().count())
        .chain([CORNER.len(), 6])
        .max()
        .unwrap_or(CORNER.len());
    let columns = headers.len() + 1;

    let mut out = String::from("Probability of the win for the user:\n");
    out.push_str(&border('┌', '┬', '┐', width, columns));
    out.push_str(&row(
        std::iter::once(CORNER.to_string()).chain(headers.iter().cloned()),
        width,
    ));
    for (i, (_, cells)) in table.rows().enumerate() {
        out.push_str(&border('├', '┼', '┤', width, columns));
        out.push_str(&row(
            std::iter::once(headers[i].clone()).chain(cells.iter().map(ToString::to_string)),
            width,
        ));
    }
    out.push_str(&border('└', '┴', '┘', width, columns));
    out
}

/// One-line table of both rolls and who won
pub fn result(user: i64, computer: i64, outcome: GameOutcome) -> String {
    let cells = [
        ("Player".to_string(), user.to_string()),
        ("Computer".to_string(), computer.to_string()),
        ("Result".to_string(), outcome.to_string()),
    ];
    let width = cells
        .iter()
        .flat_map(|(h, v)| [h.chars().count(), v.chars().count()])
        .max()
        .unwrap_or(0);

    let mut out = border('┌', '┬', '┐', width, cells.len());
    out.push_str(&row(cells.iter().map(|(h, _)| h.clone()), width));
    out.push_str(&border('├', '┼', '┤', width, cells.len()));
    out.push_str(&row(cells.iter().map(|(_, v)| v.clone()), width));
    out.push_str(&border('└', '┴', '┘', width, cells.len()));
    out
}

fn border(left: char, mid: char, right: char, width: usize, columns: usize) -> String {
    let segment = "─".repeat(width + 2);
    let inner = vec![segment; columns].join(&mid.to_string());
    format!("{left}{inner}{right}\n")
}

fn row(cells: impl Iterator<Item = String>, width: usize) -> String {
    let padded: Vec<String> = cells.map(|c| format!(" {c:<width$} ")).collect();
    format!("│{}│\n", padded.join("│"))
}
