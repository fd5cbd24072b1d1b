use chrono::NaiveDate;
use cohort_scheduler::{
    Cohort, CohortMetadata, GridRow, Holiday, Roster, export_grid_to_csv, load_roster_from_json,
    parse_curriculum, parse_date, save_roster_to_json,
};
use std::io::{self, Write};

fn print_help() {
    println!(
        "Commands:\n  help                                Show this help\n  show                                Render the integrated calendar grid\n  cohorts                             List cohorts\n  add <id> <YYYY-MM-DD> <true|false> <name...>\n                                      Create a cohort (weekend flag, then name)\n  item <id> <subject, instructor, days>\n                                      Append a curriculum item to a cohort\n  clone <id> <new_id>                 Duplicate a cohort under a new id\n  delete <id>                         Delete a cohort\n  start <id> <YYYY-MM-DD>             Change a cohort's start date\n  weekends <id> <true|false>          Toggle weekend training for a cohort\n  holiday <YYYY-MM-DD> <name...>      Add a custom holiday\n  holidays                            List holidays\n  instructors                         List distinct instructors\n  conflicts                           Report instructor double-bookings\n  counts <YYYY-MM-DD>                 Per-instructor cohort counts for a date\n  compute                             Recompute every cohort's schedule\n  save <path>                         Save roster state as JSON\n  load <path>                         Load roster state from JSON\n  export <path>                       Export the calendar grid as CSV\n  quit|exit                           Exit"
    );
}

fn render_grid_as_text_table(roster: &Roster, grid: &[GridRow]) -> String {
    let mut col_names = vec!["date".to_string(), "holiday".to_string()];
    col_names.extend(roster.cohorts().iter().map(|c| c.name().to_string()));

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(grid.len());
    for row in grid {
        let mut cells = Vec::with_capacity(col_names.len());
        cells.push(format!("{} ({})", row.date, row.weekday));
        cells.push(row.holiday.clone().unwrap_or_default());
        for cell in &row.cells {
            cells.push(match cell {
                Some(cell) if cell.conflicted => {
                    format!("{} ({}) !", cell.subject, cell.instructor)
                }
                Some(cell) => format!("{} ({})", cell.subject, cell.instructor),
                None => String::new(),
            });
        }
        rows.push(cells);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row in &rows {
        out.push('|');
        for (ci, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn show_grid(roster: &Roster) {
    match roster.schedule_grid() {
        Ok(grid) if grid.is_empty() => println!("No scheduled days yet."),
        Ok(grid) => println!("{}", render_grid_as_text_table(roster, &grid)),
        Err(e) => println!("Error building grid: {}", e),
    }
}

fn print_cohorts(roster: &Roster) {
    if roster.cohorts().is_empty() {
        println!("No cohorts.");
        return;
    }
    for cohort in roster.cohorts() {
        println!(
            "{:<12} {} (starts {}, weekends={}, items={})",
            cohort.id(),
            cohort.name(),
            cohort.start_date(),
            cohort.include_weekends(),
            cohort.dataframe().height()
        );
    }
}

fn parse_cli_date(input: &str) -> Option<NaiveDate> {
    match parse_date(input) {
        Ok(d) => Some(d),
        Err(e) => {
            println!("Error: {}", e);
            None
        }
    }
}

fn parse_cli_bool(input: &str) -> Option<bool> {
    match input.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            println!("Invalid bool (true|false)");
            None
        }
    }
}

fn main() {
    let mut roster = Roster::new();

    println!("Cohort Scheduler (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "show" => {
                show_grid(&roster);
            }
            "cohorts" => {
                print_cohorts(&roster);
            }
            "add" => {
                let id_s = parts.next();
                let date_s = parts.next();
                let weekends_s = parts.next();
                let name = parts.collect::<Vec<_>>().join(" ");
                match (id_s, date_s, weekends_s) {
                    (Some(id), Some(date_s), Some(weekends_s)) if !name.is_empty() => {
                        let Some(date) = parse_cli_date(date_s) else {
                            continue;
                        };
                        let Some(include_weekends) = parse_cli_bool(weekends_s) else {
                            continue;
                        };
                        let metadata = CohortMetadata::new(id, name, date, include_weekends);
                        match roster.add_cohort(Cohort::new(metadata)) {
                            Ok(_) => println!("Cohort {id} added."),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: add <id> <YYYY-MM-DD> <true|false> <name...>"),
                }
            }
            "item" => {
                let id_s = parts.next();
                let rest = parts.collect::<Vec<_>>().join(" ");
                match id_s {
                    Some(id) if !rest.is_empty() => match parse_curriculum(&rest) {
                        Ok(items) => {
                            let mut failed = false;
                            for item in items {
                                match roster.push_cohort_item(id, item) {
                                    Ok(true) => {}
                                    Ok(false) => {
                                        println!("Cohort {id} not found.");
                                        failed = true;
                                        break;
                                    }
                                    Err(e) => {
                                        println!("Error: {}", e);
                                        failed = true;
                                        break;
                                    }
                                }
                            }
                            if !failed {
                                println!("Curriculum updated.");
                                show_grid(&roster);
                            }
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Usage: item <id> <subject, instructor, days>"),
                }
            }
            "clone" => {
                let id_s = parts.next();
                let new_id_s = parts.next();
                match (id_s, new_id_s) {
                    (Some(id), Some(new_id)) => match roster.clone_cohort(id, new_id) {
                        Ok(true) => println!("Cohort {id} cloned as {new_id}."),
                        Ok(false) => println!("Cohort {id} not found."),
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Usage: clone <id> <new_id>"),
                }
            }
            "delete" => match parts.next() {
                Some(id) => {
                    if roster.delete_cohort(id) {
                        println!("Deleted cohort {id}.");
                    } else {
                        println!("Cohort {id} not found.");
                    }
                }
                None => println!("Usage: delete <id>"),
            },
            "start" => {
                let id_s = parts.next();
                let date_s = parts.next();
                match (id_s, date_s) {
                    (Some(id), Some(date_s)) => {
                        let Some(date) = parse_cli_date(date_s) else {
                            continue;
                        };
                        match roster.set_cohort_start_date(id, date) {
                            Ok(true) => show_grid(&roster),
                            Ok(false) => println!("Cohort {id} not found."),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: start <id> <YYYY-MM-DD>"),
                }
            }
            "weekends" => {
                let id_s = parts.next();
                let flag_s = parts.next();
                match (id_s, flag_s) {
                    (Some(id), Some(flag_s)) => {
                        let Some(flag) = parse_cli_bool(flag_s) else {
                            continue;
                        };
                        match roster.set_cohort_include_weekends(id, flag) {
                            Ok(true) => show_grid(&roster),
                            Ok(false) => println!("Cohort {id} not found."),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: weekends <id> <true|false>"),
                }
            }
            "holiday" => {
                let date_s = parts.next();
                let name = parts.collect::<Vec<_>>().join(" ");
                match date_s {
                    Some(date_s) if !name.is_empty() => {
                        let Some(date) = parse_cli_date(date_s) else {
                            continue;
                        };
                        let summary = roster.add_holiday(Holiday::new(date, name));
                        println!("Holiday added ({}).", summary.to_cli_summary());
                    }
                    _ => println!("Usage: holiday <YYYY-MM-DD> <name...>"),
                }
            }
            "holidays" => {
                for holiday in roster.calendar().holidays() {
                    println!("{}  {}", holiday.date, holiday.name);
                }
            }
            "instructors" => match roster.instructors() {
                Ok(instructors) => {
                    for name in instructors {
                        println!("{name}");
                    }
                }
                Err(e) => println!("Error: {}", e),
            },
            "conflicts" => match roster.conflicts() {
                Ok(scan) if !scan.has_conflicts => println!("No conflicts."),
                Ok(scan) => {
                    println!("CONFLICTS DETECTED:");
                    for conflict in &scan.conflicts {
                        println!(
                            "  {}  {} in cohorts {}",
                            conflict.date,
                            conflict.instructor,
                            conflict.cohort_ids.join(", ")
                        );
                    }
                }
                Err(e) => println!("Error: {}", e),
            },
            "counts" => match parts.next() {
                Some(date_s) => {
                    let Some(date) = parse_cli_date(date_s) else {
                        continue;
                    };
                    match roster.instructor_counts(date) {
                        Ok(counts) if counts.is_empty() => println!("No assignments on {date}."),
                        Ok(counts) => {
                            let mut entries: Vec<_> = counts.into_iter().collect();
                            entries.sort();
                            for (instructor, count) in entries {
                                println!("{instructor}: {count}");
                            }
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                None => println!("Usage: counts <YYYY-MM-DD>"),
            },
            "compute" => {
                let summary = roster.recompute_all();
                println!("Recomputed ({}).", summary.to_cli_summary());
                for cohort_summary in &summary.rescheduled {
                    println!("  {}", cohort_summary.to_cli_summary());
                }
                for failure in &summary.failures {
                    println!("  cohort {}: {}", failure.cohort_id, failure.error);
                }
                show_grid(&roster);
            }
            "save" => match parts.next() {
                Some(path) => match save_roster_to_json(&roster, path) {
                    Ok(()) => println!("Roster saved to {path}."),
                    Err(e) => println!("Save error: {}", e),
                },
                None => println!("Usage: save <path>"),
            },
            "load" => match parts.next() {
                Some(path) => match load_roster_from_json(path) {
                    Ok(loaded) => {
                        roster = loaded;
                        println!("Roster loaded from {path}.");
                        show_grid(&roster);
                    }
                    Err(e) => println!("Load error: {}", e),
                },
                None => println!("Usage: load <path>"),
            },
            "export" => match parts.next() {
                Some(path) => match export_grid_to_csv(&roster, path) {
                    Ok(()) => println!("Grid exported to {path}."),
                    Err(e) => println!("Export error: {}", e),
                },
                None => println!("Usage: export <path>"),
            },
            other => {
                println!("Unknown command '{other}'. Type 'help' for commands.");
            }
        }
    }
}
