//! End-to-end pipeline test with a stubbed backend.

use std::path::Path;

use pretty_assertions::assert_eq;

use pbrsmith_core::{
    BackendError, Color, DiffusionBackend, GenerationSession, InferenceRequest,
    PbrSetOrchestrator, PngConfig, SessionConfig, TextureBuffer,
};

/// Returns a fixed 4x4 checkerboard (2x2 tiles) regardless of the prompt.
struct CheckerboardBackend;

fn checkerboard() -> TextureBuffer {
    let mut image = TextureBuffer::new(4, 4, Color::black());
    for y in 0..4 {
        for x in 0..4 {
            if (x / 2 + y / 2) % 2 == 1 {
                image.set(x, y, Color::white());
            }
        }
    }
    image
}

impl DiffusionBackend for CheckerboardBackend {
    fn load(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn infer(&mut self, _request: &InferenceRequest) -> Result<TextureBuffer, BackendError> {
        Ok(checkerboard())
    }
}

fn decode_rgb(path: &Path) -> (u32, u32, Vec<u8>) {
    let decoder = png::Decoder::new(std::fs::File::open(path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!(info.color_type, png::ColorType::Rgb);
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

fn generate_hull_plating_set(out_dir: &Path) -> pbrsmith_core::PbrTextureSet {
    let config = SessionConfig {
        width: 4,
        height: 4,
        ..SessionConfig::default()
    };
    let session = GenerationSession::new(CheckerboardBackend, config);
    let mut orchestrator = PbrSetOrchestrator::new(session);
    orchestrator.generate_set("hull_plating", out_dir).unwrap()
}

#[test]
fn base_color_file_matches_the_stub_output() {
    let dir = tempfile::tempdir().unwrap();
    let set = generate_hull_plating_set(dir.path());

    let written = std::fs::read(&set.base_color).unwrap();
    let (expected, _) =
        pbrsmith_core::png::write_rgb_to_vec_with_hash(&checkerboard(), &PngConfig::default())
            .unwrap();
    assert_eq!(written, expected);
}

#[test]
fn normal_map_is_z_dominant_and_skews_at_tile_edges() {
    let dir = tempfile::tempdir().unwrap();
    let set = generate_hull_plating_set(dir.path());

    let (width, height, pixels) = decode_rgb(&set.normal);
    assert_eq!((width, height), (4, 4));

    let mut any_skew = false;
    for px in pixels.chunks_exact(3) {
        // The surface never tilts past 45 degrees at default strength
        assert!(px[2] >= 200, "blue (z) must stay dominant, got {}", px[2]);
        if px[0] != 128 || px[1] != 128 {
            any_skew = true;
        }
    }
    assert!(any_skew, "checkerboard edges must skew some normals");
}

#[test]
fn normal_map_reflects_the_checkerboard_symmetry() {
    let dir = tempfile::tempdir().unwrap();
    let set = generate_hull_plating_set(dir.path());
    let (_, _, pixels) = decode_rgb(&set.normal);

    let at = |x: usize, y: usize| {
        let i = (y * 4 + x) * 3;
        [pixels[i], pixels[i + 1], pixels[i + 2]]
    };

    // The board is symmetric under 180-degree rotation with the gradient
    // direction flipped, so R mirrors around 255 across the center
    for y in 0..4 {
        for x in 0..4 {
            let a = at(x, y);
            let b = at(3 - x, 3 - y);
            let r_sum = a[0] as i32 + b[0] as i32;
            assert!(
                (r_sum - 255).abs() <= 1,
                "R at ({},{}) and its mirror must sum to ~255, got {} + {}",
                x,
                y,
                a[0],
                b[0]
            );
        }
    }
}

#[test]
fn metallic_roughness_bases_match_hull_plating() {
    let dir = tempfile::tempdir().unwrap();
    let set = generate_hull_plating_set(dir.path());

    let (width, height, pixels) = decode_rgb(&set.metallic_roughness);
    assert_eq!((width, height), (4, 4));

    for px in pixels.chunks_exact(3) {
        let metallic = px[0] as i32;
        let roughness = px[1] as i32;
        // hull_plating: metallic 0.9 -> 230, roughness 0.4 -> 102
        assert!((metallic - 230).abs() <= 10, "metallic {}", metallic);
        assert!((roughness - 102).abs() <= 10, "roughness {}", roughness);
        assert_eq!(px[2], 0);
    }
}

#[test]
fn whole_set_is_deterministic_for_a_fixed_backend() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let set_a = generate_hull_plating_set(dir_a.path());
    let set_b = generate_hull_plating_set(dir_b.path());

    for (a, b) in [
        (&set_a.base_color, &set_b.base_color),
        (&set_a.normal, &set_b.normal),
        (&set_a.metallic_roughness, &set_b.metallic_roughness),
    ] {
        assert_eq!(
            std::fs::read(a).unwrap(),
            std::fs::read(b).unwrap(),
            "{} differs between runs",
            a.display()
        );
    }
}
