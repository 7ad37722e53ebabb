use pretty_assertions::assert_eq;

use crate::{Reg, RegKind, RegisterCatalogue, RegisterTable};

fn x86ish() -> (RegisterTable, Reg, Reg, Reg) {
    let mut table = RegisterTable::new();
    let eax = table.add("eax", true);
    let ax = table.add("ax", true);
    let esp = table.add("esp", false);
    table.add_alias(eax, ax);
    (table, eax, ax, esp)
}

#[test]
fn kinds_follow_id_space() {
    let (table, eax, _, _) = x86ish();
    assert_eq!(table.kind(eax), RegKind::Physical);
    assert_eq!(table.kind(Reg::virt(0)), RegKind::Virtual);
    assert!(Reg::virt(0).is_virtual());
    assert_eq!(Reg::virt(5).number(), 5);
}

#[test]
fn allocatability() {
    let (table, eax, _, esp) = x86ish();
    assert!(table.is_allocatable(eax));
    assert!(!table.is_allocatable(esp));
    assert!(table.is_allocatable(Reg::virt(12)));
    // Undescribed physical registers are never handed out.
    assert!(!table.is_allocatable(Reg::phys(40)));
}

#[test]
fn aliases_are_symmetric_and_unique() {
    let (mut table, eax, ax, esp) = x86ish();
    table.add_alias(ax, eax);
    table.add_alias(eax, eax);

    assert_eq!(table.aliases(eax), &[ax]);
    assert_eq!(table.aliases(ax), &[eax]);
    assert!(table.aliases(esp).is_empty());
    assert!(table.aliases(Reg::virt(0)).is_empty());
}

#[test]
fn names() {
    let (table, eax, _, _) = x86ish();
    assert_eq!(table.name(eax), "eax");
    assert_eq!(table.name(Reg::virt(3)), "%v3");
    assert_eq!(table.len(), 3);
    assert!(!table.is_empty());
}
