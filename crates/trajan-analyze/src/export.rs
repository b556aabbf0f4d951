//! Export of decoded and analyzed data into a hierarchical store.
//!
//! One group per category (`xl_data`, `filament_data`, `analysis`). Each
//! export deletes its prior group first, honoring the store's write-once
//! dataset contract, so old and new shapes never mix.

use anyhow::Result;
use trajan_core::result::SeedResult;
use trajan_core::store::{AttrValue, DataStore};
use trajan_core::types::Vec3;
use trajan_trace::SeedTrajectory;

fn flatten_vec3(series: &[Vec3]) -> Vec<f64> {
    series.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
}

fn flatten_pairs(series: &[[f64; 2]]) -> Vec<f64> {
    series.iter().flatten().copied().collect()
}

/// Write the decoded (pre-analysis) data of one seed.
///
/// Mirrors the collect stage: ragged bound-head lists under `xl_data`,
/// slot-ordered filament geometry under `filament_data`.
pub fn trajectory_to_store<S: DataStore>(traj: &SeedTrajectory, store: &mut S) -> Result<()> {
    store.delete_group("xl_data");
    store.delete_group("filament_data");

    store.put_array("xl_data/time", &[traj.time.len()], traj.time.clone())?;
    for (slot, name) in [(0usize, "0"), (1, "1")] {
        store.put_ragged(
            &format!("xl_data/doubly_bound/{name}"),
            traj.bound.iter().map(|b| b.doubly[slot].clone()).collect(),
        )?;
        store.put_ragged(
            &format!("xl_data/singly_bound/{name}"),
            traj.bound.iter().map(|b| b.singly[slot].clone()).collect(),
        )?;
    }

    let n = traj.frame_count();
    for (slot, name) in [(0usize, "0"), (1, "1")] {
        let pos: Vec<Vec3> = traj.fil_pos.iter().map(|f| f[slot]).collect();
        let orient: Vec<Vec3> = traj.fil_orient.iter().map(|f| f[slot]).collect();
        store.put_array(
            &format!("filament_data/filament_position/{name}"),
            &[n, 3],
            flatten_vec3(&pos),
        )?;
        store.put_array(
            &format!("filament_data/filament_orientation/{name}"),
            &[n, 3],
            flatten_vec3(&orient),
        )?;
    }
    store.set_attr(
        "filament_data",
        "lengths",
        AttrValue::FloatVec(traj.lengths.to_vec()),
    )?;
    Ok(())
}

/// Write one seed's analysis datasets.
pub fn seed_result_to_store<S: DataStore>(res: &SeedResult, store: &mut S) -> Result<()> {
    store.delete_group("analysis");
    store.create_group("analysis")?;
    store.set_attr("analysis", "seed", AttrValue::Int(res.seed as i64))?;

    let n = res.frame_count();
    store.put_array("analysis/xl_zeroth_moment", &[n], res.zeroth_moment.clone())?;
    store.put_array("analysis/xl_first_moments", &[n, 2], flatten_pairs(&res.first_moments))?;
    store.put_array(
        "analysis/xl_second_moments",
        &[n, 3],
        res.second_moments.iter().flatten().copied().collect(),
    )?;
    store.put_array(
        "analysis/singly_bound_number",
        &[n, 2],
        flatten_pairs(&res.singly_bound_number),
    )?;

    let sgl = &res.singly_bound_distr;
    let bins = sgl.counts[0].len();
    store.put_array(
        "analysis/singly_bound_distr",
        &[2, bins],
        sgl.counts.iter().flatten().copied().collect(),
    )?;
    store.set_attr(
        "analysis/singly_bound_distr",
        "bin_edges",
        AttrValue::FloatVec(sgl.edges.clone()),
    )?;

    let dbl = &res.doubly_bound_distr;
    let (nx, ny) = (dbl.counts.len(), dbl.counts.first().map_or(0, Vec::len));
    store.put_array(
        "analysis/average_doubly_bound_distr",
        &[nx, ny],
        dbl.counts.iter().flatten().copied().collect(),
    )?;
    store.set_attr(
        "analysis/average_doubly_bound_distr",
        "xedges",
        AttrValue::FloatVec(dbl.xedges.clone()),
    )?;
    store.set_attr(
        "analysis/average_doubly_bound_distr",
        "yedges",
        AttrValue::FloatVec(dbl.yedges.clone()),
    )?;

    let stretch_bins = res.stretch_distr.edges.len().saturating_sub(1);
    store.put_array(
        "analysis/xl_stretch",
        &[n, stretch_bins],
        res.stretch_distr.per_frame.iter().flatten().copied().collect(),
    )?;
    store.set_attr(
        "analysis/xl_stretch",
        "bin_edges",
        AttrValue::FloatVec(res.stretch_distr.edges.clone()),
    )?;

    store.put_array("analysis/xl_forces", &[n, 3], flatten_vec3(&res.forces))?;
    store.put_array(
        "analysis/xl_torques",
        &[n, 2, 3],
        res.torques
            .iter()
            .flat_map(|[a, b]| [a.x, a.y, a.z, b.x, b.y, b.z])
            .collect(),
    )?;
    store.put_array("analysis/xl_linear_work", &[n, 2], flatten_pairs(&res.linear_work))?;
    store.put_array(
        "analysis/xl_rotational_work",
        &[n, 2],
        flatten_pairs(&res.rotational_work),
    )?;

    store.put_array("analysis/fil_separation", &[n, 3], flatten_vec3(&res.fil_separation))?;
    store.put_array("analysis/fil_angle", &[n], res.fil_angle.clone())?;

    if let Some(trap) = &res.trap_force {
        let m = trap.force.len();
        store.put_array("analysis/ot_time", &[m], trap.time.clone())?;
        store.put_array("analysis/ot_force", &[m, 3], flatten_vec3(&trap.force))?;
    }
    Ok(())
}
