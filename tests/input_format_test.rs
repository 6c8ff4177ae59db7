use flate2::write::GzEncoder;
use flate2::Compression;
use samyama_structure::graph::{Element, ElementId, ElementKind};
use samyama_structure::io::ElementInputFormat;
use samyama_structure::{ErrorCategory, InputConfig, StructureError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn vertex_line(id: i64) -> String {
    // Varying widths so that split boundaries land at different line offsets
    let name = "x".repeat((id % 7) as usize + 1);
    format!(
        r#"{{"type":"vertex","id":{},"label":"person","properties":{{"name":["{}"]}}}}"#,
        id, name
    )
}

fn edge_line(id: i64, out_id: i64, in_id: i64) -> String {
    format!(
        r#"{{"type":"edge","id":{},"label":"knows","out_vertex":{{"id":{},"label":"person"}},"in_vertex":{{"id":{},"label":"person"}}}}"#,
        id, out_id, in_id
    )
}

fn write_file(dir: &TempDir, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

fn format_with_split_size(split_size: u64) -> ElementInputFormat {
    ElementInputFormat::new(InputConfig {
        split_size,
        ..InputConfig::default()
    })
    .unwrap()
}

fn ids_per_split(format: &ElementInputFormat, path: &Path) -> Vec<Vec<i64>> {
    format
        .splits(path)
        .unwrap()
        .iter()
        .map(|split| {
            format
                .create_record_reader(split)
                .unwrap()
                .map(|element| element.unwrap().id().as_integer().unwrap())
                .collect()
        })
        .collect()
}

#[test]
fn test_every_line_read_by_exactly_one_split() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (1..=100).map(vertex_line).collect();
    let path = write_file(&dir, "vertices.json", &lines);

    for split_size in [1, 17, 64, 100, 333, 4096] {
        let format = format_with_split_size(split_size);
        let per_split = ids_per_split(&format, &path);
        let all: Vec<i64> = per_split.into_iter().flatten().collect();
        assert_eq!(all, (1..=100).collect::<Vec<_>>(), "split_size {}", split_size);
    }
}

#[test]
fn test_splits_cover_the_file() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (1..=20).map(vertex_line).collect();
    let path = write_file(&dir, "vertices.json", &lines);
    let length = std::fs::metadata(&path).unwrap().len();

    let format = format_with_split_size(100);
    let splits = format.splits(&path).unwrap();
    assert!(splits.len() > 1);
    assert_eq!(splits[0].start, 0);
    for pair in splits.windows(2) {
        assert_eq!(pair[0].end(), pair[1].start);
    }
    assert_eq!(splits.last().unwrap().end(), length);
}

#[test]
fn test_mixed_vertices_and_edges() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        vertex_line(1),
        String::new(),
        vertex_line(2),
        edge_line(7, 1, 2),
    ];
    let path = write_file(&dir, "modern.json", &lines);

    let elements = format_with_split_size(1024).read_all(&path).unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[0].kind(), ElementKind::Vertex);
    assert_eq!(elements[2].kind(), ElementKind::Edge);
    assert_eq!(elements[2].to_string(), "e[7][1-knows->2]");
}

#[test]
fn test_gzip_input_is_a_single_split() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vertices.json.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    for id in 1..=50 {
        writeln!(encoder, "{}", vertex_line(id)).unwrap();
    }
    encoder.finish().unwrap();

    let format = format_with_split_size(16);
    assert!(!format.is_splittable(&path));
    assert_eq!(format.splits(&path).unwrap().len(), 1);

    let elements = format.read_all(&path).unwrap();
    assert_eq!(elements.len(), 50);
    assert_eq!(elements[49].id(), &ElementId::Integer(50));
}

#[test]
fn test_malformed_record_reports_offset() {
    let dir = TempDir::new().unwrap();
    let lines = vec![vertex_line(1), "not json".to_string(), vertex_line(3)];
    let path = write_file(&dir, "broken.json", &lines);
    let bad_offset = (lines[0].len() + 1) as u64;

    let err = format_with_split_size(1024).read_all(&path).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Input);
    match err {
        StructureError::MalformedRecord { offset, .. } => assert_eq!(offset, bad_offset),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_oversized_record_is_skipped() {
    let dir = TempDir::new().unwrap();
    let huge = format!(
        r#"{{"type":"vertex","id":2,"label":"person","properties":{{"bio":["{}"]}}}}"#,
        "y".repeat(1000)
    );
    let lines = vec![vertex_line(1), huge, vertex_line(3)];
    let path = write_file(&dir, "huge.json", &lines);

    let format = ElementInputFormat::new(InputConfig {
        max_record_bytes: 200,
        ..InputConfig::default()
    })
    .unwrap();
    let splits = format.splits(&path).unwrap();
    assert_eq!(splits.len(), 1);

    let mut reader = format.create_record_reader(&splits[0]).unwrap();
    let ids: Vec<i64> = reader
        .by_ref()
        .map(|element| element.unwrap().id().as_integer().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(reader.records_read(), 2);
    assert_eq!(reader.records_skipped(), 1);
}

#[test]
fn test_record_of_exactly_max_bytes_is_kept() {
    let dir = TempDir::new().unwrap();
    let line = vertex_line(1);
    let path = write_file(&dir, "exact.json", &[line.clone()]);

    let exact = ElementInputFormat::new(InputConfig {
        max_record_bytes: line.len(),
        ..InputConfig::default()
    })
    .unwrap();
    assert_eq!(exact.read_all(&path).unwrap().len(), 1);

    let one_short = ElementInputFormat::new(InputConfig {
        max_record_bytes: line.len() - 1,
        ..InputConfig::default()
    })
    .unwrap();
    assert!(one_short.read_all(&path).unwrap().is_empty());
}

#[test]
fn test_crlf_record_of_exactly_max_bytes_is_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crlf.json");
    let line = vertex_line(1);
    // Ids 1 and 8 produce lines of the same width
    std::fs::write(&path, format!("{}\r\n{}\r\n", line, vertex_line(8))).unwrap();

    let format = ElementInputFormat::new(InputConfig {
        max_record_bytes: line.len(),
        ..InputConfig::default()
    })
    .unwrap();
    let ids: Vec<i64> = format
        .read_all(&path)
        .unwrap()
        .iter()
        .map(|element| element.id().as_integer().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 8]);
}

#[test]
fn test_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty.json", &[]);
    let format = format_with_split_size(8);
    assert_eq!(format.splits(&path).unwrap().len(), 1);
    assert!(format.read_all(&path).unwrap().is_empty());
}

#[test]
fn test_config_from_yaml() {
    let config = InputConfig::from_yaml_str("split_size: 128\n").unwrap();
    assert_eq!(config.split_size, 128);
    assert_eq!(config.max_record_bytes, InputConfig::default().max_record_bytes);
    assert!(InputConfig::from_yaml_str("split_size: 0\n").is_err());
}
