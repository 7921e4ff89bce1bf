use super::attrs::Visibility;
use super::error::{Result, SemaError};
use super::ids::SymbolId;
use super::scheduler::Scheduler;
use super::stage::Stage;
use super::symbol::{Symbol, SymbolKind, SymbolTable};
use super::ty::Linkage;
use sdc_core::{Name, Span};

fn stub(table: &mut SymbolTable, n: u32) -> SymbolId {
    table.insert(Symbol::stub(
        Span::synthetic(),
        Name::from_raw(n),
        Linkage::D,
        Visibility::Public,
        SymbolKind::Module { is_package: false },
    ))
}

/// Two symbols that each need the other at `Populated`, but each
/// publishes `Populated` before requiring its peer — the scheduler
/// must not treat this as a cycle (mirrors spec §8 scenario 6: a
/// self-referential struct).
fn tolerant_advance(scheduler: &mut Scheduler, sym: SymbolId, target: Stage) -> Result<()> {
    scheduler.symbols.get_mut(sym).advance_to(Stage::Populated);
    let peer = SymbolId::from_raw(1 - sym.as_u32());
    if scheduler.symbols.get(peer).step < Stage::Populated {
        scheduler.require(peer, Stage::Populated)?;
    }
    if target > Stage::Populated {
        scheduler.symbols.get_mut(sym).advance_to(target);
    }
    Ok(())
}

#[test]
fn mutually_referential_symbols_do_not_cycle() {
    let mut scheduler = Scheduler::new_bare(tolerant_advance);
    let a = stub(&mut scheduler.symbols, 0);
    let _b = stub(&mut scheduler.symbols, 1);

    assert!(scheduler.require(a, Stage::Populated).is_ok());
    assert_eq!(scheduler.symbols.get(a).step, Stage::Populated);
}

/// A symbol that requires a strictly higher stage of itself through a
/// dependency still mid-advance is a genuine cycle.
fn genuine_cycle_advance(scheduler: &mut Scheduler, sym: SymbolId, target: Stage) -> Result<()> {
    let peer = SymbolId::from_raw(1 - sym.as_u32());
    scheduler.require(peer, target)?;
    scheduler.symbols.get_mut(sym).advance_to(target);
    Ok(())
}

#[test]
fn true_mutual_dependency_on_processed_fails() {
    let mut scheduler = Scheduler::new_bare(genuine_cycle_advance);
    let a = stub(&mut scheduler.symbols, 0);
    let _b = stub(&mut scheduler.symbols, 1);

    let result = scheduler.require(a, Stage::Processed);
    assert!(matches!(result, Err(SemaError::CycleError(_))));
}

#[test]
fn require_is_a_no_op_once_stage_already_reached() {
    let mut scheduler = Scheduler::new_bare(tolerant_advance);
    let a = stub(&mut scheduler.symbols, 0);
    let _b = stub(&mut scheduler.symbols, 1);

    scheduler.symbols.get_mut(a).advance_to(Stage::Processed);
    assert!(scheduler.require(a, Stage::Populated).is_ok());
    assert_eq!(scheduler.symbols.get(a).step, Stage::Processed);
}
