use super::error::EngineError;
use crate::core::models::molecule::MoleculeGraph;
use tracing::{debug, instrument, trace};

/// The contract between this crate and a 2D layout engine.
///
/// An engine is driven in a fixed sequence: [`initialize`](Self::initialize)
/// with the molecule, then [`generate_coordinates`](Self::generate_coordinates)
/// once, and finally [`teardown`](Self::teardown), which always runs, whether
/// the earlier steps succeeded or not.
///
/// Engines write positions into the molecule in place. They must not add,
/// remove or reorder atoms; [`run_layout`] checks this afterwards.
///
/// No `Send`/`Sync` bound is required. An engine that keeps hidden global
/// state is not safe to run from several threads at once, and callers are
/// responsible for serializing such engines.
pub trait LayoutEngine {
    /// Prepares the engine for the given molecule.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot accept the molecule.
    fn initialize(&mut self, molecule: &MoleculeGraph) -> Result<(), EngineError>;

    /// Computes coordinates and stores them on the molecule's atoms.
    ///
    /// # Errors
    ///
    /// Returns an error if coordinate generation fails.
    fn generate_coordinates(&mut self, molecule: &mut MoleculeGraph) -> Result<(), EngineError>;

    /// Releases whatever the engine acquired in `initialize`.
    fn teardown(&mut self) {}
}

/// Scoped use of a [`LayoutEngine`].
///
/// Opening a session initializes the engine; dropping it tears the engine
/// down. Teardown therefore happens on every exit path, including early
/// returns and unwinding.
pub struct LayoutSession<'e, E: LayoutEngine + ?Sized> {
    engine: &'e mut E,
}

impl<'e, E: LayoutEngine + ?Sized> LayoutSession<'e, E> {
    pub fn open(engine: &'e mut E, molecule: &MoleculeGraph) -> Result<Self, EngineError> {
        let session = Self { engine };
        session.engine.initialize(molecule)?;
        Ok(session)
    }

    pub fn run(&mut self, molecule: &mut MoleculeGraph) -> Result<(), EngineError> {
        self.engine.generate_coordinates(molecule)
    }
}

impl<E: LayoutEngine + ?Sized> Drop for LayoutSession<'_, E> {
    fn drop(&mut self) {
        trace!("Tearing down layout engine.");
        self.engine.teardown();
    }
}

/// Runs a layout engine over a molecule, populating every atom's position in place.
///
/// Any positions already present are discarded first, so that the
/// postcondition below reflects the engine's own output.
///
/// # Errors
///
/// - [`EngineError::EmptyInput`] if the molecule has no atoms; the engine is
///   not touched in that case.
/// - [`EngineError::LayoutFailed`] if the engine reports a failure, changes
///   the atom set or order, or leaves an atom without a finite position.
#[instrument(skip_all, name = "layout", fields(atoms = molecule.len(), bonds = molecule.bond_count()))]
pub fn run_layout<E: LayoutEngine + ?Sized>(
    molecule: &mut MoleculeGraph,
    engine: &mut E,
) -> Result<(), EngineError> {
    if molecule.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    molecule.clear_positions();
    let atom_ids = molecule.atom_ids().to_vec();

    {
        let mut session = LayoutSession::open(engine, molecule)?;
        session.run(molecule)?;
    }

    if molecule.atom_ids() != atom_ids.as_slice() {
        return Err(EngineError::layout_failed(format!(
            "engine changed the atom set ({} atoms before, {} after)",
            atom_ids.len(),
            molecule.len()
        )));
    }

    if let Some(index) = molecule
        .atoms_iter()
        .position(|(_, atom)| !atom.has_finite_position())
    {
        return Err(EngineError::layout_failed(format!(
            "atom {} has no finite position after layout",
            index
        )));
    }

    debug!("Layout finished; all atoms positioned.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::builder::build_graph;
    use nalgebra::Point2;
    use std::panic::{self, AssertUnwindSafe};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Behavior {
        Succeed,
        FailInitialize,
        FailGenerate,
        WriteNan,
        SkipLastAtom,
        AddAtom,
        Panic,
    }

    /// Scripted engine that records the calls it receives.
    struct ScriptedEngine {
        behavior: Behavior,
        calls: Vec<&'static str>,
    }

    impl ScriptedEngine {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                calls: Vec::new(),
            }
        }
    }

    impl LayoutEngine for ScriptedEngine {
        fn initialize(&mut self, _molecule: &MoleculeGraph) -> Result<(), EngineError> {
            self.calls.push("initialize");
            if self.behavior == Behavior::FailInitialize {
                return Err(EngineError::layout_failed("cannot initialize"));
            }
            Ok(())
        }

        fn generate_coordinates(&mut self, molecule: &mut MoleculeGraph) -> Result<(), EngineError> {
            self.calls.push("generate");
            match self.behavior {
                Behavior::FailGenerate => return Err(EngineError::layout_failed("diverged")),
                Behavior::Panic => panic!("engine bug"),
                Behavior::AddAtom => {
                    molecule.add_atom(Atom::new(1));
                }
                _ => {}
            }
            let count = match self.behavior {
                Behavior::SkipLastAtom => molecule.len() - 1,
                _ => molecule.len(),
            };
            for index in 0..count {
                let id = molecule.id_at(index).unwrap();
                let x = if self.behavior == Behavior::WriteNan {
                    f64::NAN
                } else {
                    index as f64
                };
                molecule.set_position(id, Point2::new(x, 0.0));
            }
            Ok(())
        }

        fn teardown(&mut self) {
            self.calls.push("teardown");
        }
    }

    fn two_atoms() -> MoleculeGraph {
        build_graph(2, &[7u8, 6], 1, &[0u16, 1, 1]).unwrap()
    }

    #[test]
    fn successful_run_calls_engine_in_order_and_positions_atoms() {
        let mut molecule = two_atoms();
        let mut engine = ScriptedEngine::new(Behavior::Succeed);
        run_layout(&mut molecule, &mut engine).unwrap();

        assert_eq!(engine.calls, vec!["initialize", "generate", "teardown"]);
        assert!(molecule.is_fully_positioned());
        assert_eq!(molecule.atom_at(1).unwrap().position, Some(Point2::new(1.0, 0.0)));
    }

    #[test]
    fn empty_molecule_is_rejected_without_touching_engine() {
        let mut molecule = MoleculeGraph::new();
        let mut engine = ScriptedEngine::new(Behavior::Succeed);
        assert_eq!(
            run_layout(&mut molecule, &mut engine),
            Err(EngineError::EmptyInput)
        );
        assert!(engine.calls.is_empty());
    }

    #[test]
    fn teardown_runs_when_initialize_fails() {
        let mut molecule = two_atoms();
        let mut engine = ScriptedEngine::new(Behavior::FailInitialize);
        let result = run_layout(&mut molecule, &mut engine);
        assert!(matches!(result, Err(EngineError::LayoutFailed { .. })));
        assert_eq!(engine.calls, vec!["initialize", "teardown"]);
    }

    #[test]
    fn teardown_runs_when_generation_fails() {
        let mut molecule = two_atoms();
        let mut engine = ScriptedEngine::new(Behavior::FailGenerate);
        let result = run_layout(&mut molecule, &mut engine);
        assert_eq!(result, Err(EngineError::layout_failed("diverged")));
        assert_eq!(engine.calls, vec!["initialize", "generate", "teardown"]);
    }

    #[test]
    fn teardown_runs_when_generation_panics() {
        let mut molecule = two_atoms();
        let mut engine = ScriptedEngine::new(Behavior::Panic);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            run_layout(&mut molecule, &mut engine)
        }));
        assert!(outcome.is_err());
        assert_eq!(engine.calls, vec!["initialize", "generate", "teardown"]);
    }

    #[test]
    fn non_finite_positions_fail_the_layout() {
        let mut molecule = two_atoms();
        let mut engine = ScriptedEngine::new(Behavior::WriteNan);
        let result = run_layout(&mut molecule, &mut engine);
        assert!(matches!(result, Err(EngineError::LayoutFailed { reason }) if reason.contains("atom 0")));
    }

    #[test]
    fn missing_positions_fail_the_layout() {
        let mut molecule = two_atoms();
        let mut engine = ScriptedEngine::new(Behavior::SkipLastAtom);
        let result = run_layout(&mut molecule, &mut engine);
        assert!(matches!(result, Err(EngineError::LayoutFailed { reason }) if reason.contains("atom 1")));
    }

    #[test]
    fn stale_positions_do_not_satisfy_the_postcondition() {
        let mut molecule = two_atoms();
        for index in 0..2 {
            let id = molecule.id_at(index).unwrap();
            molecule.set_position(id, Point2::new(5.0, 5.0));
        }
        let mut engine = ScriptedEngine::new(Behavior::SkipLastAtom);
        assert!(run_layout(&mut molecule, &mut engine).is_err());
    }

    #[test]
    fn engines_may_not_change_the_atom_set() {
        let mut molecule = two_atoms();
        let mut engine = ScriptedEngine::new(Behavior::AddAtom);
        let result = run_layout(&mut molecule, &mut engine);
        assert!(matches!(result, Err(EngineError::LayoutFailed { reason }) if reason.contains("atom set")));
        assert_eq!(engine.calls.last(), Some(&"teardown"));
    }
}
