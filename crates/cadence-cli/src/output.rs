use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    println!();
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", render_table(headers, &rows));
}

/// Render a two-space-separated table. Count columns (every cell an integer,
/// like the roster's DONE/ACTIVE/MISSED/RUN) are right-aligned so the digits
/// line up; text columns are left-aligned.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(cell.len());
        }
    }
    let numeric: Vec<bool> = (0..cols)
        .map(|i| {
            !rows.is_empty()
                && rows
                    .iter()
                    .all(|row| row.get(i).is_some_and(|c| c.parse::<i64>().is_ok()))
        })
        .collect();

    let cell = |text: &str, i: usize| {
        if numeric[i] {
            format!("{:>width$}", text, width = widths[i])
        } else {
            format!("{:<width$}", text, width = widths[i])
        }
    };

    let mut out = String::new();
    let header: Vec<String> = headers.iter().enumerate().map(|(i, h)| cell(h, i)).collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&sep.join("  "));
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .take(cols)
            .map(|(i, c)| cell(c, i))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn count_columns_right_align() {
        let rendered = render_table(
            &["USER", "DONE"],
            &[row(&["ana", "2"]), row(&["evangeline", "14"])],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "USER        DONE");
        assert_eq!(lines[2], "ana            2");
        assert_eq!(lines[3], "evangeline    14");
    }

    #[test]
    fn text_columns_left_align() {
        let rendered = render_table(
            &["ID", "STATUS"],
            &[row(&["a1", "active"]), row(&["b2", "missed"])],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "a1  active");
        assert_eq!(lines[3], "b2  missed");
    }

    #[test]
    fn headerless_cells_are_ignored() {
        // Rows wider than the header row are truncated to it.
        let rendered = render_table(&["ID"], &[row(&["a1", "stray"])]);
        assert!(!rendered.contains("stray"));
    }
}
