use std::io::Write;
use std::path::PathBuf;

use dwgmap_frontend::errors::FrontendError;
use dwgmap_frontend::extract_georeferenced_geometry;

fn write_sample_dwg() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("创建临时文件失败");
    file.write_all(b"AC1015 sample").expect("写入临时文件失败");
    file
}

#[test]
fn boundary_operation_produces_aligned_batch() {
    let file = write_sample_dwg();

    let batch = extract_georeferenced_geometry(file.path(), 30.0).expect("边界操作失败");
    assert!(batch.is_aligned(), "平行序列对齐契约被破坏");

    // 演示内容：一条线段 + 两段多段线 + 一个标注。
    assert_eq!(batch.segment_count(), 3);
    assert_eq!(batch.label_count(), 1);
    assert_eq!(batch.line_colors, vec![1, 3, 3]);
    assert_eq!(batch.line_layers[0], "Roads");
    assert_eq!(batch.text_contents, vec!["101/5".to_string()]);

    // 演示坐标的量级对应中纬度区域。
    for pair in batch.line_coordinates.chunks_exact(2) {
        assert!((40.0..=41.0).contains(&pair[0]), "纬度越界: {}", pair[0]);
        assert!((29.5..=30.5).contains(&pair[1]), "经度越界: {}", pair[1]);
    }
}

#[test]
fn decode_failure_aborts_with_typed_error() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data/missing.dwg");

    match extract_georeferenced_geometry(&path, 30.0) {
        Err(FrontendError::Decode(_)) => {}
        other => panic!("期望 Decode 错误，实际为 {other:?}"),
    }
}

#[test]
fn non_finite_meridian_surfaces_extract_error() {
    let file = write_sample_dwg();

    match extract_georeferenced_geometry(file.path(), f64::NAN) {
        Err(FrontendError::Extract(_)) => {}
        other => panic!("期望 Extract 错误，实际为 {other:?}"),
    }
}
