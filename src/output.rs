use xliff_workspace::{FileWatchEvent, WorkspaceIndex, WorkspaceScan};

/// Print a scan result.
///
/// - `json = true`: emit the scan as a pretty-printed JSON object to stdout.
/// - `json = false`: one line per group with its languages, then a summary.
///
/// Groups without a source file are flagged on **stderr** so that stdout
/// stays clean for downstream consumers.
pub fn print_scan(scan: &WorkspaceScan, json: bool) {
    if json {
        match serde_json::to_string_pretty(scan) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("error serialising scan: {}", e),
        }
        return;
    }

    for group in &scan.groups {
        println!(
            "{}  [{}]",
            group.display_name(),
            group.languages().join(", ")
        );
    }
    println!(
        "Found {} translation group(s), {} file(s) in {}",
        scan.groups.len(),
        scan.total_files,
        scan.root.display()
    );

    let orphans = scan
        .groups
        .iter()
        .filter(|g| g.source_file().is_none())
        .count();
    if orphans > 0 {
        eprintln!("  {} group(s) without a source file", orphans);
    }
}

/// Print one watch event, with the state of its group after applying it.
///
/// Text mode prints `<kind> <path>` followed by the group's languages, or
/// `(removed)` when the group no longer exists. JSON mode prints the event
/// object on a single line.
pub fn print_event(event: &FileWatchEvent, index: &WorkspaceIndex, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("error serialising event: {}", e),
        }
        return;
    }

    let group = match index.group_for_path(event.path()) {
        Some(g) => format!("{} [{}]", g.display_name(), g.languages().join(", ")),
        None => "(removed)".to_string(),
    };
    println!(
        "{:<6} {}  -> {}",
        event.kind_label(),
        event.path().display(),
        group
    );
}
