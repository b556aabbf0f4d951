// Property checks over the header arithmetic and the packed layouts.

use proptest::prelude::*;
use trajan_core::schema::{RecordLayout as _, HEADER_SIZE};
use trajan_core::types::{FilamentRecord, Header, Vec3};

proptest! {
    // frame_count is floor division, and every frame time lands on the
    // stride grid.
    #[test]
    fn frame_count_is_floor_division(
        n_steps in 0i32..1_000_000,
        n_posit in 1i32..10_000,
        delta in 1e-6f64..1.0,
    ) {
        let h = Header { n_steps, n_posit, delta };
        prop_assert_eq!(h.frame_count(), (n_steps / n_posit) as usize);
        let t3 = h.frame_time(3);
        prop_assert!((t3 - 3.0 * f64::from(n_posit) * delta).abs() < 1e-9 * t3.abs().max(1.0));
    }

    // The header always encodes to exactly its declared size and decodes
    // back to itself.
    #[test]
    fn header_round_trips(
        n_steps in i32::MIN..i32::MAX,
        n_posit in 1i32..i32::MAX,
        delta in -1e9f64..1e9,
    ) {
        let h = Header { n_steps, n_posit, delta };
        let mut buf = Vec::new();
        h.write_to(&mut buf).unwrap();
        prop_assert_eq!(buf.len(), HEADER_SIZE);
        prop_assert_eq!(Header::read_from(&mut buf.as_slice()).unwrap(), h);
    }

    // Filament records survive the wire byte-for-byte.
    #[test]
    fn filament_round_trips(
        px in -1e6f64..1e6,
        uy in -1.0f64..1.0,
        length in 0.1f64..100.0,
        mesh_id in 1i32..1000,
    ) {
        let fil = FilamentRecord {
            pos: Vec3::new(px, 0.0, 0.0),
            spos: Vec3::new(px, 0.0, 0.0),
            orient: Vec3::new(0.0, uy, 0.0),
            diameter: 1.0,
            length,
            mesh_id,
        };
        let mut buf = Vec::new();
        fil.write_to(&mut buf).unwrap();
        prop_assert_eq!(buf.len(), FilamentRecord::SIZE);
        prop_assert_eq!(FilamentRecord::read_from(&mut buf.as_slice()).unwrap(), fil);
    }

    // Normalizing any nonzero vector yields unit length.
    #[test]
    fn normalized_is_unit_or_zero(
        x in -1e3f64..1e3,
        y in -1e3f64..1e3,
        z in -1e3f64..1e3,
    ) {
        let v = Vec3::new(x, y, z);
        let n = v.normalized();
        if v.norm() == 0.0 {
            prop_assert_eq!(n, Vec3::ZERO);
        } else {
            prop_assert!((n.norm() - 1.0).abs() < 1e-9);
        }
    }
}
