//! Tests for argument parsing and command dispatch

#[cfg(test)]
mod tests {
    use crate::fixtures::{drifting_abc_slices, write_slices};
    use clap::{CommandFactory, Parser};
    use slicecomp::CompositeError;
    use slicecomp::algorithm::assembly::AssemblyConfig;
    use slicecomp::algorithm::locator::LocatorConfig;
    use slicecomp::io::cli::{Cli, Command, CommandProcessor, Outcome, init_logging};
    use slicecomp::io::configuration::EXIT_INCONSISTENT_OVERLAP;
    use std::ffi::OsStr;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("slicecomp").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    // Tests the derived parser is internally consistent
    // Verified by giving two arguments the same short flag
    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    // Tests assemble without flags uses the library defaults
    // Verified by changing a clap default_value_t
    #[test]
    fn test_assemble_defaults() {
        let cli = parse(&["assemble", "slices", "out/sheet.png"]);

        let Command::Assemble(args) = &cli.command else {
            panic!("expected assemble");
        };
        assert_eq!(args.slices, PathBuf::from("slices"));
        assert_eq!(args.composite, PathBuf::from("out/sheet.png"));

        let options = args.options();
        assert_eq!(options.locator, LocatorConfig::default());
        assert_eq!(options.assembly, AssemblyConfig::default());
        assert_eq!(options.group_name, None);
        assert_eq!(options.layout_path, None);
        assert!(cli.should_show_progress());
        assert_eq!(cli.default_log_filter(), "info");
    }

    // Tests every assemble flag reaches the options
    // Verified by swapping the short flags for overlap and pixels
    #[test]
    fn test_assemble_flags() {
        let cli = parse(&[
            "assemble", "slices", "sheet.png", "-s", "0.9", "-m", "16", "-p", "4", "-t", "2", "-l",
            "meta/sheet.json", "-g", "spells",
        ]);
        let Command::Assemble(args) = &cli.command else {
            panic!("expected assemble");
        };
        let options = args.options();

        assert!((options.locator.min_similarity - 0.9).abs() < f64::EPSILON);
        assert_eq!(options.locator.max_overlap, 16);
        assert_eq!(options.locator.min_overlap_pixels, 4);
        assert_eq!(options.assembly.offset_tolerance, 2);
        assert_eq!(options.layout_path, Some(PathBuf::from("meta/sheet.json")));
        assert_eq!(options.group_name.as_deref(), Some("spells"));
    }

    // Tests disassemble and render take three positional paths
    // Verified by reordering the Disassemble fields
    #[test]
    fn test_path_commands() {
        let cli = parse(&["disassemble", "edit.png", "edit.json", "out"]);
        assert!(matches!(
            &cli.command,
            Command::Disassemble { composite, layout, output }
                if composite == &PathBuf::from("edit.png")
                    && layout == &PathBuf::from("edit.json")
                    && output == &PathBuf::from("out")
        ));

        let cli = parse(&["render", "sheet.json", "slices", "sheet.png"]);
        assert!(matches!(
            &cli.command,
            Command::Render { layout, slices, composite }
                if layout == &PathBuf::from("sheet.json")
                    && slices == &PathBuf::from("slices")
                    && composite == &PathBuf::from("sheet.png")
        ));

        assert!(Cli::try_parse_from(["slicecomp", "render", "sheet.json"]).is_err());
        assert!(Cli::try_parse_from(["slicecomp"]).is_err());
    }

    // Tests quiet and verbose flags choose the log filter
    // Verified by letting verbose override quiet
    #[test]
    fn test_log_filter() {
        let quiet = parse(&["render", "a.json", "s", "a.png", "-q", "-vv"]);
        assert!(!quiet.should_show_progress());
        assert_eq!(quiet.default_log_filter(), "warn");

        assert_eq!(parse(&["-v", "render", "a.json", "s", "a.png"]).default_log_filter(), "debug");
        assert_eq!(
            parse(&["render", "a.json", "s", "a.png", "-vvv"]).default_log_filter(),
            "trace"
        );
    }

    // Tests outcomes map onto process exit codes
    // Verified by returning zero for warnings
    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::Completed.exit_code(), 0);
        assert_eq!(
            Outcome::CompletedWithWarnings(2).exit_code(),
            EXIT_INCONSISTENT_OVERLAP
        );
    }

    // Tests pipeline failures surface from the processor
    // Verified by swallowing errors into Outcome::Completed
    #[test]
    fn test_processor_reports_errors() {
        let dir = TempDir::new().expect("create temp dir");
        let layout = dir.path().join("absent.json");
        let composite = dir.path().join("out.png");
        let cli = Cli::try_parse_from([
            OsStr::new("slicecomp"),
            OsStr::new("-q"),
            OsStr::new("render"),
            layout.as_os_str(),
            dir.path().as_os_str(),
            composite.as_os_str(),
        ])
        .expect("arguments parse");

        let result = CommandProcessor::new(cli).process();

        assert!(matches!(result, Err(CompositeError::FileSystem { .. })));
        assert!(!composite.exists());
    }

    // Tests conflicting placements finish with the warning outcome
    // Verified by mapping warnings to Outcome::Completed
    #[test]
    fn test_processor_reports_warnings() {
        let dir = TempDir::new().expect("create temp dir");
        let slices = dir.path().join("slices");
        write_slices(&slices, &drifting_abc_slices());
        let composite = dir.path().join("drift.png");
        let cli = Cli::try_parse_from([
            OsStr::new("slicecomp"),
            OsStr::new("assemble"),
            slices.as_os_str(),
            composite.as_os_str(),
            OsStr::new("--quiet"),
        ])
        .expect("arguments parse");

        let outcome = CommandProcessor::new(cli).process().expect("outputs are written");

        assert_eq!(outcome, Outcome::CompletedWithWarnings(1));
        assert_eq!(outcome.exit_code(), EXIT_INCONSISTENT_OVERLAP);
        assert!(composite.exists());
        assert!(dir.path().join("drift.json").exists());
    }

    // Tests installing logging twice keeps the first subscriber
    // Verified by panicking when a subscriber is already set
    #[test]
    fn test_init_logging_twice() {
        let cli = parse(&["-q", "render", "a.json", "s", "a.png"]);
        init_logging(&cli);
        init_logging(&cli);
        assert_eq!(cli.default_log_filter(), "warn");
    }
}
