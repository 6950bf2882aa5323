use std::f64::consts::FRAC_PI_2;

use super::*;

const ARGON: ElementProps = ElementProps {
    mass: 39.95,
    epsilon: -0.0103,
    sigma: 0.34,
};

// r_min = 2^(1/6)·σ for an argon pair.
const ARGON_R_MIN: f64 = 1.122_462_048_309_373 * 0.34;

fn argon_model(n: usize) -> Model {
    let mut model = Model::new();
    model.set_size([10.0, 10.0]).unwrap();
    model.initialize_elements(&[ARGON]).unwrap();
    model.create_atoms(n).unwrap();
    model
}

fn argon_pair(separation: f64) -> Model {
    let mut model = argon_model(2);
    model
        .add_atom(&AtomProps {
            x: 5.0 - separation / 2.0,
            y: 5.0,
            ..Default::default()
        })
        .unwrap();
    model
        .add_atom(&AtomProps {
            x: 5.0 + separation / 2.0,
            y: 5.0,
            ..Default::default()
        })
        .unwrap();
    model
}

fn pair_separation(model: &Model) -> f64 {
    let atoms = model.atoms();
    (atoms.x[1] - atoms.x[0]).hypot(atoms.y[1] - atoms.y[0])
}

fn total_energy(model: &Model) -> f64 {
    model.potential_energy() + model.kinetic_energy()
}

// ------ Scenario tests ------

/// Two argon atoms released from 1.2σ oscillate about r_min with total
/// energy drift below 1%.
#[test]
fn argon_pair_oscillates_about_r_min() {
    let mut model = argon_pair(1.2 * 0.34);
    let e_0 = total_energy(&model);

    let mut min_sep = f64::INFINITY;
    let mut max_sep: f64 = 0.0;
    for _ in 0..500 {
        model.integrate(1.0, 1.0).unwrap();
        let sep = pair_separation(&model);
        min_sep = min_sep.min(sep);
        max_sep = max_sep.max(sep);
    }

    assert!(
        min_sep < ARGON_R_MIN && max_sep > ARGON_R_MIN,
        "no oscillation about r_min: [{min_sep}, {max_sep}]"
    );

    let drift = (total_energy(&model) - e_0).abs();
    assert!(
        drift < 0.01 * e_0.abs(),
        "energy drifted by {drift} eV from {e_0} eV"
    );
}

/// An opposite charge falling toward a pinned one gains the kinetic energy
/// the Coulomb potential released.
#[test]
fn coulomb_capture_conserves_energy() {
    let mut model = argon_model(2);
    model.use_lennard_jones_interaction(false);
    model.use_coulomb_interaction(true);
    model
        .add_atom(&AtomProps {
            x: 4.6,
            y: 5.0,
            charge: 1.0,
            pinned: true,
            ..Default::default()
        })
        .unwrap();
    model
        .add_atom(&AtomProps {
            x: 5.4,
            y: 5.0,
            charge: -1.0,
            ..Default::default()
        })
        .unwrap();

    let e_0 = total_energy(&model);
    model.integrate(300.0, 1.0).unwrap();

    // The free atom accelerated toward the fixed one...
    assert!(model.atoms().x[1] < 5.4);
    assert!(model.atoms().vx[1] < 0.0);
    // ...while the pinned atom never moved.
    assert_eq!(model.atoms().x[0], 4.6);
    assert_eq!(model.atoms().vx[0], 0.0);

    let kinetic = model.kinetic_energy();
    assert!(kinetic > 0.0);
    let drift = (total_energy(&model) - e_0).abs();
    assert!(
        drift < 0.01 * e_0.abs(),
        "KE did not match released Coulomb energy; drift {drift} eV"
    );
}

/// Thermostatted equilibrium holds the configured target temperature.
#[test]
fn thermostat_holds_target_temperature() {
    let mut model = argon_model(100);
    for _ in 0..100 {
        model.add_atom(&AtomProps::default()).unwrap();
    }
    model.setup_atoms_randomly(300.0).unwrap();
    model.use_thermostat(true);
    model.set_target_temperature(300.0).unwrap();

    model.integrate(2000.0, 1.0).unwrap();

    let mut out = OutputState::default();
    model.compute_output_state(&mut out);
    assert!(
        (out.temperature - 300.0).abs() < 3.0,
        "temperature settled at {}",
        out.temperature
    );
}

/// Head-on elastic collision with an equal-mass movable obstacle transfers
/// the atom's velocity completely.
#[test]
fn equal_mass_obstacle_collision_swaps_velocities() {
    let mut model = argon_model(1);
    model.use_lennard_jones_interaction(false);
    model
        .add_atom(&AtomProps {
            x: 2.0,
            y: 5.0,
            vx: 0.01,
            ..Default::default()
        })
        .unwrap();
    model
        .add_obstacle(&ObstacleProps {
            x: 5.0,
            y: 4.0,
            width: 1.0,
            height: 2.0,
            mass: 39.95,
            ..Default::default()
        })
        .unwrap();

    model.integrate(500.0, 1.0).unwrap();

    let ob_vx = model.obstacles()[0].vx;
    assert!((ob_vx - 0.01).abs() < 1e-9, "obstacle picked up vx = {ob_vx}");
    assert!(
        model.atoms().vx[0].abs() < 1e-9,
        "atom kept vx = {}",
        model.atoms().vx[0]
    );

    // No probes were enabled, so no pressure was recorded.
    let mut out = OutputState::default();
    model.compute_output_state(&mut out);
    assert!(out.probes.is_empty());
    assert_eq!(model.obstacles()[0].probe_impulse, [0.0; 4]);
}

/// A harmonic radial bond oscillates with period 2π√(μ/k).
#[test]
fn radial_bond_period_matches_reduced_mass() {
    let mut model = argon_pair(0.25);
    model
        .add_radial_bond(&RadialBondProps {
            atom1: 0,
            atom2: 1,
            length: 0.2,
            strength: 10.0,
            style: BondStyle::default(),
        })
        .unwrap();

    // μ = m/2; k converted to MW units.
    let mu = 39.95 / 2.0;
    let k_mw = 10.0 * units::MW_ENERGY_PER_EV;
    let expected_period = std::f64::consts::TAU * (mu / k_mw).sqrt();

    // The pair starts at a turning point; the next separation maximum comes
    // one full period later.
    let mut best_t = 0.0;
    let mut best_sep: f64 = 0.0;
    for step in 1..=1200 {
        model.integrate(1.0, 1.0).unwrap();
        let sep = pair_separation(&model);
        let t = step as f64;
        if t > 0.7 * expected_period && t < 1.3 * expected_period && sep > best_sep {
            best_sep = sep;
            best_t = t;
        }
    }

    let relative_error = (best_t - expected_period).abs() / expected_period;
    assert!(
        relative_error < 0.05,
        "period {best_t} fs vs expected {expected_period} fs"
    );
}

/// Steepest descent walks a deeply overlapping pair back past σ.
#[test]
fn minimize_energy_relaxes_repulsive_overlap() {
    let mut model = Model::new();
    model.set_size([10.0, 10.0]).unwrap();
    let light = ElementProps {
        mass: 1.0,
        epsilon: -0.1,
        sigma: 0.34,
    };
    model.initialize_elements(&[light]).unwrap();
    model.create_atoms(2).unwrap();
    let half = 0.5 * 0.34 / 2.0;
    model
        .add_atom(&AtomProps {
            x: 5.0 - half,
            y: 5.0,
            ..Default::default()
        })
        .unwrap();
    model
        .add_atom(&AtomProps {
            x: 5.0 + half,
            y: 5.0,
            ..Default::default()
        })
        .unwrap();

    let iters = model.minimize_energy().unwrap();
    assert!(iters < 3000, "did not converge in {iters} iterations");

    let sep = pair_separation(&model);
    assert!(
        sep >= 0.34 && sep <= 2.0 * 0.34,
        "final separation {sep} outside [σ, 2σ]"
    );

    for i in 0..2 {
        let acc = model.atoms().ax[i].hypot(model.atoms().ay[i]);
        assert!(acc < 1e-4, "residual acceleration {acc}");
    }
}

/// Snapshot, restore, and replay reproduce the exact trajectory.
#[test]
fn snapshot_round_trip_is_exact() {
    let mut model = argon_pair(1.2 * 0.34);
    model.integrate(50.0, 1.0).unwrap();

    let snapshot = model.state();

    // Immediate restore is bit-identical.
    model.restore(&snapshot);
    assert_eq!(model.get_time(), snapshot.time);
    assert_eq!(model.atoms().x, snapshot.atoms.x);
    assert_eq!(model.atoms().px, snapshot.atoms.px);

    // Replay from the snapshot matches the first run bit for bit.
    model.integrate(100.0, 1.0).unwrap();
    let first_run: Vec<f64> = model.atoms().x.clone();
    let first_vx: Vec<f64> = model.atoms().vx.clone();

    model.restore(&snapshot);
    model.integrate(100.0, 1.0).unwrap();

    assert_eq!(model.atoms().x, first_run);
    assert_eq!(model.atoms().vx, first_vx);
}

/// With no thermostat, gravity, drag, bonds, obstacles, or Coulomb, total
/// energy is conserved over 10⁴ steps.
#[test]
fn long_run_conserves_energy() {
    let mut model = argon_pair(1.15 * 0.34);
    let e_0 = total_energy(&model);

    model.integrate(10_000.0, 1.0).unwrap();

    let drift = (total_energy(&model) - e_0).abs();
    assert!(
        drift < 0.01 * e_0.abs(),
        "energy drifted by {drift} eV over 10^4 steps"
    );
}

// ------ Invariants ------

#[test]
fn momentum_stays_in_lockstep_with_velocity() {
    let mut model = argon_pair(0.5);
    model
        .set_atom_properties(
            0,
            &AtomUpdate {
                vx: Some(0.004),
                vy: Some(-0.002),
                ..Default::default()
            },
        )
        .unwrap();

    let atoms = model.atoms();
    assert_eq!(atoms.px[0], atoms.mass[0] * atoms.vx[0]);
    assert_eq!(atoms.py[0], atoms.mass[0] * atoms.vy[0]);
}

#[test]
fn charged_list_tracks_nonzero_charges() {
    let mut model = argon_model(3);
    model
        .add_atom(&AtomProps {
            x: 2.0,
            y: 2.0,
            charge: 1.0,
            ..Default::default()
        })
        .unwrap();
    model
        .add_atom(&AtomProps {
            x: 4.0,
            y: 2.0,
            ..Default::default()
        })
        .unwrap();
    model
        .add_atom(&AtomProps {
            x: 6.0,
            y: 2.0,
            charge: -0.5,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(model.charged, vec![0, 2]);

    model
        .set_atom_properties(
            0,
            &AtomUpdate {
                charge: Some(0.0),
                ..Default::default()
            },
        )
        .unwrap();
    model
        .set_atom_properties(
            1,
            &AtomUpdate {
                charge: Some(2.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(model.charged, vec![1, 2]);
}

#[test]
fn element_change_propagates_mass_and_radius() {
    let mut model = argon_pair(1.0);
    model
        .set_element_properties(
            0,
            &ElementUpdate {
                mass: Some(20.0),
                sigma: Some(0.3),
                ..Default::default()
            },
        )
        .unwrap();

    let atoms = model.atoms();
    assert_eq!(atoms.mass[0], 20.0);
    assert_eq!(atoms.mass[1], 20.0);
    assert!((atoms.radius[0] - forces::lj_radius(0.3)).abs() < 1e-12);
    // Momentum followed the new mass.
    assert_eq!(atoms.px[0], atoms.mass[0] * atoms.vx[0]);
}

#[test]
fn bonded_pair_feels_no_nonbonded_force() {
    let mut model = argon_model(2);
    model.use_coulomb_interaction(true);
    // Opposite charges at bonded rest length: without the exclusion both LJ
    // and Coulomb would pull on them.
    model
        .add_atom(&AtomProps {
            x: 4.8,
            y: 5.0,
            charge: 1.0,
            ..Default::default()
        })
        .unwrap();
    model
        .add_atom(&AtomProps {
            x: 5.2,
            y: 5.0,
            charge: -1.0,
            ..Default::default()
        })
        .unwrap();
    model
        .add_radial_bond(&RadialBondProps {
            atom1: 0,
            atom2: 1,
            length: 0.4,
            strength: 5.0,
            style: BondStyle::default(),
        })
        .unwrap();

    model.compute_accelerations();
    for i in 0..2 {
        assert!(
            model.atoms.ax[i].abs() < 1e-15,
            "bonded pair saw residual force {}",
            model.atoms.ax[i]
        );
        assert!(model.atoms.ay[i].abs() < 1e-15);
    }
}

#[test]
fn bond_matrix_is_symmetric() {
    let mut model = argon_pair(0.4);
    model
        .add_radial_bond(&RadialBondProps {
            atom1: 1,
            atom2: 0,
            length: 0.3,
            strength: 2.0,
            style: BondStyle::Spring,
        })
        .unwrap();

    assert!(model.radial_bonds.bonded(0, 1));
    assert!(model.radial_bonds.bonded(1, 0));
}

#[test]
fn atoms_stay_inside_walls() {
    let mut model = argon_model(1);
    model
        .add_atom(&AtomProps {
            x: 5.0,
            y: 5.0,
            vx: 0.05,
            vy: -0.03,
            ..Default::default()
        })
        .unwrap();

    for _ in 0..50 {
        model.integrate(20.0, 1.0).unwrap();
        assert!(model.atom_in_bounds(0).unwrap());
    }
}

#[test]
fn thermostatted_step_lands_exactly_on_target() {
    let mut model = argon_pair(1.5 * 0.34);
    model
        .set_atom_properties(
            0,
            &AtomUpdate {
                vx: Some(0.001),
                ..Default::default()
            },
        )
        .unwrap();
    model.use_thermostat(true);
    model.set_target_temperature(150.0).unwrap();

    model.integrate(10.0, 1.0).unwrap();

    let t = model.temperature();
    assert!(
        ((t - 150.0) / 150.0).abs() < 1e-12,
        "instantaneous T was {t}"
    );
}

#[test]
fn neighbor_list_covers_all_forces_cutoff_pairs() {
    let mut model = argon_model(50);
    for _ in 0..50 {
        model.add_atom(&AtomProps::default()).unwrap();
    }
    model.setup_atoms_randomly(200.0).unwrap();
    model.integrate(100.0, 1.0).unwrap();

    let atoms = model.atoms();
    let cutoff_sq = model.pair_lj.cutoff_sq[0][0];
    for i in 0..atoms.count() {
        let partners = model.get_atom_neighbors(i).unwrap();
        for j in 0..atoms.count() {
            if i == j || model.radial_bonds.bonded(i, j) {
                continue;
            }
            let dx = atoms.x[j] - atoms.x[i];
            let dy = atoms.y[j] - atoms.y[i];
            if dx * dx + dy * dy < cutoff_sq {
                assert!(
                    partners.contains(&j),
                    "pair ({i}, {j}) within cutoff missing from the list"
                );
            }
        }
    }
}

// ------ Surface behavior ------

#[test]
fn setup_ordering_is_enforced() {
    let mut model = Model::new();
    assert!(model.create_atoms(5).is_err(), "atoms before elements");

    model.initialize_elements(&[ARGON]).unwrap();
    model.create_atoms(5).unwrap();
    assert!(model.create_atoms(5).is_err(), "atoms created twice");
    assert!(model.set_size([4.0, 4.0]).is_err(), "size after atoms");
}

#[test]
fn size_can_only_be_set_once() {
    let mut model = Model::new();
    model.set_size([8.0, 6.0]).unwrap();
    assert_eq!(model.get_size(), [8.0, 6.0]);
    assert!(model.set_size([5.0, 5.0]).is_err());
}

#[test]
fn atom_count_is_range_checked() {
    let mut model = Model::new();
    model.initialize_elements(&[ARGON]).unwrap();
    assert!(model.create_atoms(0).is_err());

    let mut model = Model::new();
    model.initialize_elements(&[ARGON]).unwrap();
    assert!(model.create_atoms(1001).is_err());

    let mut model = Model::new();
    model.initialize_elements(&[ARGON]).unwrap();
    assert!(model.create_atoms(1000).is_ok());
}

#[test]
fn invalid_temperatures_are_rejected() {
    let mut model = Model::new();
    assert!(model.set_target_temperature(f64::NAN).is_err());
    assert!(model.set_target_temperature(-1.0).is_err());
    assert!(model.set_target_temperature(f64::INFINITY).is_err());
    assert!(model.set_target_temperature(0.0).is_ok());
}

#[test]
fn integrate_requires_atoms() {
    let mut model = Model::new();
    assert!(model.integrate(10.0, 1.0).is_err());

    model.initialize_elements(&[ARGON]).unwrap();
    model.create_atoms(2).unwrap();
    assert!(model.integrate(10.0, 1.0).is_err(), "no atoms added yet");
}

#[test]
fn runaway_velocity_reports_divergence() {
    let mut model = argon_model(1);
    model
        .add_atom(&AtomProps {
            x: 5.0,
            y: 5.0,
            vx: 1.0e6,
            ..Default::default()
        })
        .unwrap();

    let result = model.integrate(10.0, 1.0);
    assert!(result.is_err());
    assert!(result.unwrap_err().descrip.contains("diverged"));
}

#[test]
fn spring_force_slots_are_stable() {
    let mut model = argon_pair(1.0);
    let s0 = model.add_spring_force(0, 1.0, 1.0, 5.0).unwrap();
    let s1 = model.add_spring_force(1, 2.0, 2.0, 5.0).unwrap();
    assert_ne!(s0, s1);

    model.remove_spring_force(s0).unwrap();
    assert!(model.update_spring_force(s0, 3.0, 3.0).is_err());

    // The freed slot is reused; the other spring is untouched.
    let s2 = model.add_spring_force(0, 4.0, 4.0, 5.0).unwrap();
    assert_eq!(s2, s0);
    model.update_spring_force(s1, 2.5, 2.5).unwrap();
}

#[test]
fn pressure_probe_accumulates_wall_impacts() {
    let mut model = argon_model(1);
    model.use_lennard_jones_interaction(false);
    model
        .add_atom(&AtomProps {
            x: 2.0,
            y: 5.0,
            vx: 0.01,
            ..Default::default()
        })
        .unwrap();
    model
        .add_obstacle(&ObstacleProps {
            x: 5.0,
            y: 3.0,
            width: 1.0,
            height: 4.0,
            west_probe: true,
            ..Default::default()
        })
        .unwrap();

    model.integrate(3000.0, 1.0).unwrap();

    let mut out = OutputState::default();
    model.compute_output_state(&mut out);
    assert_eq!(out.probes.len(), 1);
    assert_eq!(out.probes[0].side, Side::West);
    assert!(
        out.probes[0].pressure > 0.0,
        "west probe read {}",
        out.probes[0].pressure
    );
}

#[test]
fn vdw_pairs_exclude_bonded_and_like_charged() {
    let mut model = argon_model(4);
    for (x, charge) in [(4.8, 0.0), (5.2, 0.0), (5.0, 1.0), (5.35, 1.0)] {
        model
            .add_atom(&AtomProps {
                x,
                y: 5.0,
                charge,
                ..Default::default()
            })
            .unwrap();
    }

    model.update_vdw_pairs();
    // Like-charged (2, 3) must be absent; the neutral close pair present.
    assert!(model.vdw_pairs().contains(&(0, 1)));
    assert!(!model.vdw_pairs().contains(&(2, 3)));

    model
        .add_radial_bond(&RadialBondProps {
            atom1: 0,
            atom2: 1,
            length: 0.4,
            strength: 1.0,
            style: BondStyle::default(),
        })
        .unwrap();
    model.update_vdw_pairs();
    assert!(!model.vdw_pairs().contains(&(0, 1)));
}

#[test]
fn molecule_query_walks_the_bond_graph() {
    let mut model = argon_model(4);
    for x in [2.0, 2.4, 2.8, 6.0] {
        model
            .add_atom(&AtomProps {
                x,
                y: 5.0,
                ..Default::default()
            })
            .unwrap();
    }
    for (a, b) in [(0, 1), (1, 2)] {
        model
            .add_radial_bond(&RadialBondProps {
                atom1: a,
                atom2: b,
                length: 0.4,
                strength: 1.0,
                style: BondStyle::default(),
            })
            .unwrap();
    }

    assert_eq!(model.get_molecule_atoms(0).unwrap(), vec![1, 2]);
    assert_eq!(model.get_bonded_atoms(1).unwrap(), vec![0, 2]);
    assert!(model.get_molecule_atoms(3).unwrap().is_empty());
}

#[test]
fn relaxation_settles_on_the_requested_temperature() {
    let mut model = argon_model(1);
    model
        .add_atom(&AtomProps {
            x: 5.0,
            y: 5.0,
            vx: 0.001,
            ..Default::default()
        })
        .unwrap();

    model.relax_to_temperature(150.0).unwrap();
    assert!(!model.temperature_change_in_progress());
    assert!(((model.temperature() - 150.0) / 150.0).abs() < 0.01);
}

#[test]
fn setup_atoms_randomly_hits_the_exact_temperature() {
    let mut model = argon_model(16);
    for _ in 0..16 {
        model.add_atom(&AtomProps::default()).unwrap();
    }
    model.setup_atoms_randomly(300.0).unwrap();

    assert!(((model.temperature() - 300.0) / 300.0).abs() < 1e-9);
    for i in 0..16 {
        assert!(model.atom_in_bounds(i).unwrap());
    }
}

#[test]
fn placement_respects_overlap_and_bounds() {
    let mut model = argon_model(1);
    model
        .add_atom(&AtomProps {
            x: 5.0,
            y: 5.0,
            ..Default::default()
        })
        .unwrap();

    assert!(model.can_place_atom(0, 7.0, 7.0, None));
    assert!(!model.can_place_atom(0, 5.1, 5.0, None), "overlap");
    assert!(!model.can_place_atom(0, 0.05, 5.0, None), "outside walls");
    assert!(model.can_place_atom(0, 5.1, 5.0, Some(0)), "excluded self");
}

#[test]
fn minimum_pe_sits_on_the_equilibrium_ring() {
    let mut model = argon_model(1);
    model
        .add_atom(&AtomProps {
            x: 5.0,
            y: 5.0,
            ..Default::default()
        })
        .unwrap();

    let (x, y) = model.find_minimum_pe_location(0, 0.0).unwrap();
    let dist = (x - 5.0).hypot(y - 5.0);
    assert!(
        (dist - ARGON_R_MIN).abs() < 0.02,
        "minimum found at distance {dist}, expected {ARGON_R_MIN}"
    );

    let calc = model.potential_calculator(0, 0.0);
    assert!(calc.potential(x, y) < 0.0);
}

#[test]
fn drag_and_gravity_enter_the_acceleration() {
    let mut model = argon_model(1);
    model
        .add_atom(&AtomProps {
            x: 5.0,
            y: 5.0,
            vx: 0.01,
            friction: 2.0,
            ..Default::default()
        })
        .unwrap();
    model.set_viscosity(0.5);
    model.set_gravitational_field(Some(1.0e-8));

    model.compute_accelerations();
    assert!((model.atoms.ax[0] + 0.5 * 2.0 * 0.01).abs() < 1e-15);
    assert!((model.atoms.ay[0] + 1.0e-8).abs() < 1e-15);
}

#[test]
fn restraint_pulls_back_toward_anchor() {
    let mut model = argon_model(1);
    model
        .add_atom(&AtomProps {
            x: 6.0,
            y: 5.0,
            ..Default::default()
        })
        .unwrap();
    model
        .add_restraint(Restraint {
            atom: 0,
            k: 5.0,
            x0: 5.0,
            y0: 5.0,
        })
        .unwrap();

    model.compute_accelerations();
    assert!(model.atoms.ax[0] < 0.0);
    assert!(model.atoms.ay[0].abs() < 1e-18);
}

#[test]
fn angular_bond_forces_balance() {
    let mut model = argon_model(3);
    for (x, y) in [(5.4, 5.0), (5.0, 5.3), (5.0, 5.0)] {
        model
            .add_atom(&AtomProps {
                x,
                y,
                ..Default::default()
            })
            .unwrap();
    }
    // Rest angle well away from the current π/2.
    model
        .add_angular_bond(&AngularBondProps {
            atom1: 0,
            atom2: 1,
            atom3: 2,
            angle: FRAC_PI_2 / 2.0,
            strength: 5.0,
        })
        .unwrap();
    model.use_lennard_jones_interaction(false);

    model.compute_accelerations();

    // Newton's third law over the triplet: mass-weighted accelerations sum
    // to zero.
    let fx: f64 = (0..3).map(|i| model.atoms.ax[i] * model.atoms.mass[i]).sum();
    let fy: f64 = (0..3).map(|i| model.atoms.ay[i] * model.atoms.mass[i]).sum();
    assert!(fx.abs() < 1e-15);
    assert!(fy.abs() < 1e-15);

    // And the bond is actually doing something.
    assert!(model.atoms.ax[0].abs() > 0.0 || model.atoms.ay[0].abs() > 0.0);
}
