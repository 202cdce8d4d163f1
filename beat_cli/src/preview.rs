use std::fmt::Write;

use beat_data::{Beatmap, Lane, NoteKind, LANE_COUNT};

/// One row per distinct note time, one column per lane.
pub fn render_timeline(beatmap: &Beatmap) -> String {
    let mut out = String::new();

    if beatmap.is_empty() {
        out.push_str("Beatmap is empty.\n");
        return out;
    }

    let mut notes = beatmap.notes.clone();
    notes.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.lane.cmp(&b.lane)));

    let _ = write!(out, "Beatmap: {} notes over {:.1}s", notes.len(), beatmap.duration);
    if let Some(seed) = beatmap.seed {
        let _ = write!(out, " (seed {seed})");
    }
    if beatmap.placeholder {
        out.push_str(" [placeholder]");
    }
    out.push('\n');

    let header: Vec<String> = Lane::ALL.iter().map(|lane| lane.arrow().to_string()).collect();
    let _ = writeln!(out, "Time(s)  | {} | Kind", header.join(" "));
    let _ = writeln!(out, "---------|---------|------------------");

    for row in notes.chunk_by(|a, b| a.time == b.time) {
        let mut cells = ['.'; LANE_COUNT];
        for note in row {
            cells[note.lane.index()] = lane_char(note.kind);
        }
        let cells: Vec<String> = cells.iter().map(char::to_string).collect();
        let kind = kind_name(row[0].kind);
        let _ = writeln!(out, "{:8.3} | {} | {}", row[0].time, cells.join(" "), kind);
    }

    out
}

fn lane_char(kind: NoteKind) -> char {
    match kind {
        NoteKind::Single => 'o',
        NoteKind::Simultaneous => 'x',
        NoteKind::Double => 'd',
        NoteKind::Triple => 't',
        NoteKind::Stream => 's',
    }
}

fn kind_name(kind: NoteKind) -> &'static str {
    match kind {
        NoteKind::Single => "single",
        NoteKind::Simultaneous => "simultaneous",
        NoteKind::Double => "double",
        NoteKind::Triple => "triple",
        NoteKind::Stream => "stream",
    }
}
