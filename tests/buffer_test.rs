// End-to-end checks of the buffer lifecycle through the public API
use extrude_buffer::{
    AtlasPosition, Buffer, BufferConfig, ExtrudeStrategy, Feature, ImageAtlas, NormalMode, WallStrategy,
};

const FEATURES_JSON: &str = r#"[
    {
        "coordinates": [[[120.10, 30.20], [120.11, 30.20], [120.11, 30.21], [120.10, 30.21], [120.10, 30.20]]],
        "color": [1.0, 0.0, 0.0, 1.0],
        "size": 30,
        "pattern": "brick",
        "id": 5
    },
    {
        "coordinates": [[[120.12, 30.22], [120.13, 30.22], [120.13, 30.23]]],
        "color": [0.0, 0.0, 1.0, 0.5],
        "size": [12.0, 4.0],
        "pattern": "unknown",
        "id": 0
    },
    {
        "coordinates": [[[120.14, 30.24]]]
    }
]"#;

fn atlas() -> ImageAtlas {
    let mut atlas = ImageAtlas::new();
    atlas.insert("brick".to_string(), AtlasPosition { x: 64.0, y: 32.0 });
    atlas
}

fn features() -> Vec<Feature> {
    serde_json::from_str(FEATURES_JSON).expect("Failed to parse features")
}

#[test]
fn test_wall_layout_conservation() {
    let features = features();
    let buffer = Buffer::new(&features, atlas(), &BufferConfig::default(), &WallStrategy).unwrap();

    // 5 points -> 4 segments, 3 points -> 2 segments, 1 point -> none
    assert_eq!(buffer.vertices_count(), (4 + 2) * 4);
    assert_eq!(buffer.index_count(), (4 + 2) * 6);

    let emitted_vertices: usize = buffer.layout().features.iter().map(|f| f.vertex_range().len()).sum();
    let emitted_indices: usize = buffer.layout().features.iter().map(|f| f.index_range().len()).sum();
    assert_eq!(emitted_vertices, buffer.vertices_count());
    assert_eq!(emitted_indices, buffer.index_count());
    assert!(buffer.index_array().iter().all(|&i| (i as usize) < buffer.vertices_count()));

    println!(
        "✓ {} features -> {} vertices, {} indices",
        features.len(),
        buffer.vertices_count(),
        buffer.index_count()
    );
}

#[test]
fn test_wall_attributes() {
    let buffer = Buffer::new(&features(), atlas(), &BufferConfig::default(), &WallStrategy).unwrap();
    let attributes = buffer.attributes();

    // first feature: vertices 0..16
    assert!(attributes.picking_ids[..16].iter().all(|&id| id == 5.0));
    assert!(attributes.sizes[..16].iter().all(|&s| s == 30.0));
    assert!(attributes.patterns[..32].chunks_exact(2).all(|p| p == [64.0, 32.0]));

    // second feature: vertices 16..24, id 0 untouched, unknown pattern -> origin
    assert!(attributes.picking_ids[16..24].iter().all(|&id| id == 0.0));
    assert!(attributes.sizes[16..24].iter().all(|&s| s == 12.0));
    assert!(attributes.patterns[32..48].iter().all(|&p| p == 0.0));
    assert!(attributes.colors[64..96].chunks_exact(4).all(|c| c == [0.0, 0.0, 1.0, 0.5]));

    // wall heights follow the size, ground at zero
    assert_eq!(attributes.positions[2], 30.0);
    assert_eq!(attributes.positions[8], 0.0);
    assert_eq!(attributes.positions[16 * 3 + 2], 12.0);
}

#[test]
fn test_identical_input_gives_identical_buffers() {
    let config = BufferConfig {
        uv: true,
        compute_normals: true,
        normal_mode: NormalMode::EdgeAccumulation,
    };
    let a = Buffer::new(&features(), atlas(), &config, &ExtrudeStrategy).unwrap();
    let b = Buffer::new(&features(), atlas(), &config, &ExtrudeStrategy).unwrap();

    assert_eq!(a.attributes(), b.attributes());
    assert_eq!(a.index_array(), b.index_array());
    assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
}

#[test]
fn test_normals_are_unit_length() {
    let config = BufferConfig {
        compute_normals: true,
        ..BufferConfig::default()
    };
    let buffer = Buffer::new(&features(), atlas(), &config, &WallStrategy).unwrap();
    let normals = buffer.attributes().normals.as_ref().expect("normals not computed");

    for normal in normals.chunks_exact(3) {
        let length = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        assert!((length - 1.0).abs() < 1e-4, "normal {:?} has length {}", normal, length);
    }
}

#[test]
fn test_buffer_json_output() {
    let config = BufferConfig::from_json(r#"{ "uv": true }"#).unwrap();
    let buffer = Buffer::new(&features(), atlas(), &config, &WallStrategy).unwrap();
    let json = buffer.to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["verticesCount"], 24);
    assert_eq!(value["indexCount"], 36);
    assert!(value["attributes"]["uv"].is_string());
    assert!(value["attributes"].get("normals").is_none());
    assert!(value["indexArray"].is_string());
}
