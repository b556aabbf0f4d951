// Decode → classify → analyze over hand-written binary streams.

use byteorder::{LittleEndian, WriteBytesExt};
use trajan_analyze::analyze_seed;
use trajan_core::config::{FilamentParams, SimParams, XlinkParams};
use trajan_core::schema::RecordLayout;
use trajan_core::types::{
    AnchorRecord, CrosslinkRecord, FilamentRecord, Header, Vec3,
};
use trajan_trace::SeedTrajectory;

fn params(dir_tag: &str) -> SimParams {
    SimParams {
        run_name: dir_tag.to_owned(),
        seed: 0,
        anchor_id_offset: 1,
        rigid_filament: vec![FilamentParams {
            name: "fil".into(),
            length: 10.0,
            diameter: Some(1.0),
            stationary_flag: Some(true),
        }],
        crosslink: vec![XlinkParams {
            name: "xl".into(),
            concentration: None,
            k_spring: 2.0,
            n_spec: Some(100),
        }],
        optical_trap: vec![],
    }
}

fn anchor(lambda: f64, attached_id: i32) -> AnchorRecord {
    AnchorRecord {
        bound: true,
        active: true,
        is_static: false,
        pos: Vec3::ZERO,
        orient: Vec3::ZERO,
        lambda,
        attached_id,
    }
}

fn filament(mesh_id: i32, x: f64) -> FilamentRecord {
    FilamentRecord {
        pos: Vec3::new(x, 0.0, 0.0),
        spos: Vec3::ZERO,
        orient: Vec3::new(1.0, 0.0, 0.0),
        diameter: 1.0,
        length: 10.0,
        mesh_id,
    }
}

fn write_stream<T: RecordLayout>(path: &std::path::Path, header: Header, frames: &[Vec<T>]) {
    let mut buf = Vec::new();
    header.write_to(&mut buf).unwrap();
    for f in frames {
        buf.write_i32::<LittleEndian>(f.len() as i32).unwrap();
        for r in f {
            r.write_to(&mut buf).unwrap();
        }
    }
    std::fs::write(path, buf).unwrap();
}

#[test]
fn single_doubly_bound_pair_matches_the_paper_numbers() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("trajan_e2e_{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();

    let p = params("e2e");
    let header = Header { n_steps: 100, n_posit: 10, delta: 0.01 };
    let nframes = header.frame_count();
    assert_eq!(nframes, 10);

    // Frame 0 carries one doubly-bound crosslinker with raw lambdas
    // (2.0, -1.0) on filaments 1 and 2; the other frames are empty.
    let one_xl = CrosslinkRecord {
        doubly: true,
        diameter: 0.5,
        length: 1.0,
        pos: Vec3::ZERO,
        orient: Vec3::ZERO,
        anchors: [anchor(2.0, 1), anchor(-1.0, 2)],
    };
    let mut xl_frames = vec![vec![one_xl]];
    xl_frames.extend(std::iter::repeat_with(Vec::new).take(nframes - 1));

    let fil_frames: Vec<Vec<FilamentRecord>> =
        (0..nframes).map(|_| vec![filament(1, 0.0), filament(2, 1.0)]).collect();

    write_stream(&dir.join(p.crosslink_file().unwrap()), header, &xl_frames);
    write_stream(&dir.join(p.filament_file().unwrap()), header, &fil_frames);

    let traj = SeedTrajectory::decode(&dir, &p).unwrap();
    assert_eq!(traj.frame_count(), 10);

    // Re-centering with half_length = 5: stored lambdas are -3 and -6.
    assert_eq!(traj.bound[0].doubly[0], vec![-3.0]);
    assert_eq!(traj.bound[0].doubly[1], vec![-6.0]);

    let res = analyze_seed(traj, p).unwrap();
    assert_eq!(res.zeroth_moment[0], 1.0);
    assert_eq!(res.first_moments[0], [-3.0, -6.0]);
    assert_eq!(res.second_moments[0], [18.0, 9.0, 36.0]);
    // No displacement before frame 1.
    assert_eq!(res.linear_work[0], [0.0, 0.0]);
    assert_eq!(res.rotational_work[0], [0.0, 0.0]);
    // Time axis is index * stride * delta.
    assert!((res.time[1] - 0.1).abs() < 1e-12);

    let _ = std::fs::remove_dir_all(dir);
}
