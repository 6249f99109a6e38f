//! Tests for layout record validation and persistence

#[cfg(test)]
mod tests {
    use slicecomp::CompositeError;
    use slicecomp::io::layout::{LayoutRecord, Placement, layout_path_for};
    use slicecomp::spatial::{Offset, Rect};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn placement(filename: &str, x: u32, y: u32, width: u32, height: u32) -> Placement {
        Placement {
            filename: filename.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    fn abc() -> LayoutRecord {
        LayoutRecord::new(
            "spells",
            (180, 180),
            vec![
                placement("c.png", 0, 80, 100, 100),
                placement("a.png", 0, 0, 100, 100),
                placement("b.png", 80, 0, 100, 100),
            ],
        )
        .expect("valid layout")
    }

    fn is_invalid(result: Result<LayoutRecord, CompositeError>) -> bool {
        matches!(result, Err(CompositeError::InvalidLayout { .. }))
    }

    // Tests placements are kept in file name order
    // Verified by removing the sort in LayoutRecord::new
    #[test]
    fn test_new_sorts_placements() {
        let layout = abc();
        let names: Vec<&str> = layout.placements.iter().map(|p| p.filename.as_str()).collect();

        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
        assert_eq!(layout.placement("b.png").map(Placement::size), Some((100, 100)));
        assert!(layout.placement("z.png").is_none());
        assert_eq!(
            layout.placement("c.png").map(Placement::rect),
            Some(Rect::new(Offset::new(0, 80), 100, 100))
        );
    }

    // Tests every invariant violation is refused
    // Verified by returning Ok from validate
    #[test]
    fn test_validation_failures() {
        let inside = placement("a.png", 0, 0, 10, 10);

        assert!(is_invalid(LayoutRecord::new("g", (10, 10), Vec::new())));
        assert!(is_invalid(LayoutRecord::new(
            "g",
            (10, 10),
            vec![inside.clone(), inside.clone()]
        )));
        assert!(is_invalid(LayoutRecord::new(
            "g",
            (10, 10),
            vec![placement("a.png", 1, 0, 10, 10)]
        )));
        assert!(is_invalid(LayoutRecord::new(
            "g",
            (10, 10),
            vec![placement("a.png", 0, 0, 0, 10)]
        )));
        for name in ["", "dir/a.png", "..\\a.png", ".."] {
            assert!(
                is_invalid(LayoutRecord::new("g", (10, 10), vec![placement(name, 0, 0, 1, 1)])),
                "{name:?} should be rejected"
            );
        }
        assert!(LayoutRecord::new("g", (10, 10), vec![inside]).is_ok());
    }

    // Tests the JSON field names other tools read
    // Verified by dropping the serde renames
    #[test]
    fn test_json_field_names() {
        let json = abc().to_json().expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["group_name"], "spells");
        assert_eq!(value["composite_size"], serde_json::json!([180, 180]));
        assert_eq!(value["images"][1]["filename"], "b.png");
        assert_eq!(value["images"][1]["x"], 80);
        assert_eq!(value["images"][1]["height"], 100);
        assert!(json.ends_with('\n'));
    }

    // Tests a saved record loads back identical
    // Verified by saving compact JSON with renamed keys
    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("out/spells.json");
        let layout = abc();

        layout.save(&path).expect("saves");
        let loaded = LayoutRecord::load(&path).expect("loads");

        assert_eq!(loaded, layout);
    }

    // Tests malformed and invalid records fail differently
    // Verified by validating before parsing
    #[test]
    fn test_load_failures() {
        let dir = TempDir::new().expect("create temp dir");
        let garbled = dir.path().join("garbled.json");
        let outside = dir.path().join("outside.json");
        std::fs::write(&garbled, "{ \"group_name\": ").expect("write file");
        std::fs::write(
            &outside,
            r#"{"group_name":"g","composite_size":[5,5],"images":[{"filename":"a.png","x":3,"y":0,"width":4,"height":4}]}"#,
        )
        .expect("write file");

        assert!(matches!(
            LayoutRecord::load(&garbled),
            Err(CompositeError::LayoutFormat { .. })
        ));
        assert!(is_invalid(LayoutRecord::load(&outside)));
        assert!(matches!(
            LayoutRecord::load(&dir.path().join("absent.json")),
            Err(CompositeError::FileSystem { .. })
        ));
    }

    // Tests the layout record sits beside the composite
    // Verified by appending the extension instead of replacing it
    #[test]
    fn test_layout_path_for() {
        assert_eq!(
            layout_path_for(Path::new("out/spells_composite.png")),
            PathBuf::from("out/spells_composite.json")
        );
        assert_eq!(layout_path_for(Path::new("sheet")), PathBuf::from("sheet.json"));
    }
}
