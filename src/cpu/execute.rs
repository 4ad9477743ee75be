/*!
execute.rs - 6502 instruction semantic helpers (ALU, flags, stack, RMW)

Purpose
=======
Side-effect logic shared by the dispatch families. Every helper is generic
over `CpuRegs`; memory goes through `&mut Bus` at the call site.

Scope (crate-visible)
---------------------
Flag helpers:
    set_flag, get_flag
Stack:
    push, pop, push_word, pop_word, push_status, php, plp, pha, pla
Loads / transfers:
    lda/ldx/ldy (also used for transfers and PLA)
ALU:
    adc, sbc, and/ora/eor, bit, compare
Shifts / rotates (value in, value out; callers pick accumulator or memory):
    asl, lsr, rol, ror
Memory choreography:
    rmw_memory
Branch:
    branch_target

Decimal mode
============
The D flag can be set and cleared but arithmetic is always binary.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{BREAK, CARRY, NEGATIVE, OVERFLOW, STACK_BASE, UNUSED, ZERO};

// ---------------------------------------------------------------------------
// Flag helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn set_flag<C: CpuRegs>(cpu: &mut C, mask: u8, on: bool) {
    cpu.assign_flag(mask, on);
}

#[inline]
pub(crate) fn get_flag<C: CpuRegs>(cpu: &C, mask: u8) -> bool {
    cpu.is_flag_set(mask)
}

// ---------------------------------------------------------------------------
// Stack helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn push<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u8) {
    let sp = cpu.sp();
    bus.write(STACK_BASE | sp as u16, v);
    cpu.set_sp(sp.wrapping_sub(1));
}

#[inline]
pub(crate) fn pop<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u8 {
    let sp = cpu.sp().wrapping_add(1);
    cpu.set_sp(sp);
    bus.read(STACK_BASE | sp as u16)
}

/// High byte first, then low byte.
#[inline]
pub(crate) fn push_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u16) {
    push(cpu, bus, (v >> 8) as u8);
    push(cpu, bus, v as u8);
}

/// Low byte first, then high byte.
#[inline]
pub(crate) fn pop_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    let lo = pop(cpu, bus) as u16;
    let hi = pop(cpu, bus) as u16;
    (hi << 8) | lo
}

/// Push P. `set_break` distinguishes PHP/BRK (B=1) from NMI/IRQ entry (B=0).
pub(crate) fn push_status<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, set_break: bool) {
    let v = cpu.compose_status_for_push(set_break);
    push(cpu, bus, v);
}

#[inline]
pub(crate) fn php<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    push_status(cpu, bus, true);
}

/// Pull P: bit 4 cleared, bit 5 forced, whatever was on the stack.
#[inline]
pub(crate) fn plp<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let v = pop(cpu, bus);
    cpu.set_status((v & !BREAK) | UNUSED);
}

#[inline]
pub(crate) fn pha<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let a = cpu.a();
    push(cpu, bus, a);
}

#[inline]
pub(crate) fn pla<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let v = pop(cpu, bus);
    lda(cpu, v);
}

// ---------------------------------------------------------------------------
// Loads / Transfers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn lda<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_a(v);
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn ldx<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_x(v);
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn ldy<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_y(v);
    cpu.update_zn(v);
}

// ---------------------------------------------------------------------------
// ALU
// ---------------------------------------------------------------------------

/// Binary add with carry.
///
/// With `j` = bit 7 of the operand, `k` = bit 7 of A and `c6` the carry into
/// bit 7 (`j ^ k ^ bit7(sum)`), the carry out is the majority of the three
/// and overflow is `c6 ^ c7`.
pub(crate) fn adc<C: CpuRegs>(cpu: &mut C, b: u8) {
    let a = cpu.a();
    let cin = u8::from(get_flag(cpu, CARRY));
    let sum = a.wrapping_add(b).wrapping_add(cin);

    let j = b >> 7;
    let k = a >> 7;
    let c6 = j ^ k ^ (sum >> 7);
    let c7 = (j & k) | (j & c6) | (k & c6);

    set_flag(cpu, CARRY, c7 != 0);
    set_flag(cpu, OVERFLOW, (c6 ^ c7) != 0);
    set_flag(cpu, ZERO, sum == 0);
    set_flag(cpu, NEGATIVE, (j ^ k ^ c6) != 0);
    cpu.set_a(sum);
}

/// Subtract with borrow: ADC of the complement, carry untouched.
#[inline]
pub(crate) fn sbc<C: CpuRegs>(cpu: &mut C, b: u8) {
    adc(cpu, !b);
}

#[inline]
pub(crate) fn and<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() & v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn ora<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() | v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn eor<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() ^ v;
    lda(cpu, r);
}

/// Z from A & M; N and V copied from bits 7 and 6 of M.
#[inline]
pub(crate) fn bit<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    set_flag(cpu, ZERO, (a & v) == 0);
    set_flag(cpu, NEGATIVE, (v & 0x80) != 0);
    set_flag(cpu, OVERFLOW, (v & 0x40) != 0);
}

#[inline]
pub(crate) fn compare<C: CpuRegs>(cpu: &mut C, reg: u8, v: u8) {
    set_flag(cpu, CARRY, reg >= v);
    cpu.update_zn(reg.wrapping_sub(v));
}

// ---------------------------------------------------------------------------
// Shifts / Rotates
// ---------------------------------------------------------------------------
// Carry is taken from the outgoing bit before the shift.

#[inline]
pub(crate) fn asl<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    set_flag(cpu, CARRY, (v & 0x80) != 0);
    let r = v << 1;
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn lsr<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    set_flag(cpu, CARRY, (v & 0x01) != 0);
    let r = v >> 1;
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn rol<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = u8::from(get_flag(cpu, CARRY));
    set_flag(cpu, CARRY, (v & 0x80) != 0);
    let r = (v << 1) | carry_in;
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn ror<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = if get_flag(cpu, CARRY) { 0x80 } else { 0 };
    set_flag(cpu, CARRY, (v & 0x01) != 0);
    let r = (v >> 1) | carry_in;
    cpu.update_zn(r);
    r
}

// ---------------------------------------------------------------------------
// Read-Modify-Write (memory) choreography
// ---------------------------------------------------------------------------

/// read -> write old value back -> write new value. Write hooks observe both
/// writes, as on hardware.
pub(crate) fn rmw_memory<C: CpuRegs, F>(cpu: &mut C, bus: &mut Bus, addr: u16, transform: F) -> u8
where
    F: FnOnce(&mut C, u8) -> u8,
{
    let old = bus.read(addr);
    bus.write(addr, old);
    let new = transform(cpu, old);
    bus.write(addr, new);
    new
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// Target of a relative branch taken from `pc` (the address after the operand).
#[inline]
pub(crate) fn branch_target(pc: u16, offset: u8) -> u16 {
    pc.wrapping_add(offset as i8 as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::CpuState;

    fn adc_case(a: u8, b: u8, carry: bool) -> CpuState {
        let mut cpu = CpuState::new();
        cpu.set_a(a);
        set_flag(&mut cpu, CARRY, carry);
        adc(&mut cpu, b);
        cpu
    }

    #[test]
    fn adc_signed_overflow_edges() {
        // 0x7F + 0x01: positive overflow into negative
        let c = adc_case(0x7F, 0x01, false);
        assert_eq!(c.a(), 0x80);
        assert!(get_flag(&c, OVERFLOW));
        assert!(!get_flag(&c, CARRY));
        assert!(get_flag(&c, NEGATIVE));
        assert!(!get_flag(&c, ZERO));

        // 0x80 + 0xFF: negative overflow, carry out
        let c = adc_case(0x80, 0xFF, false);
        assert_eq!(c.a(), 0x7F);
        assert!(get_flag(&c, OVERFLOW));
        assert!(get_flag(&c, CARRY));
        assert!(!get_flag(&c, NEGATIVE));

        // 0xFF + 0xFF + 1: -1 + -1 + 1 = -1, no overflow, carry out
        let c = adc_case(0xFF, 0xFF, true);
        assert_eq!(c.a(), 0xFF);
        assert!(!get_flag(&c, OVERFLOW));
        assert!(get_flag(&c, CARRY));
        assert!(get_flag(&c, NEGATIVE));
    }

    #[test]
    fn adc_matches_wide_arithmetic_reference() {
        for a in (0..=255u8).step_by(7) {
            for b in (0..=255u8).step_by(5) {
                for cin in [false, true] {
                    let c = adc_case(a, b, cin);
                    let wide = a as u16 + b as u16 + cin as u16;
                    let signed = a as i8 as i16 + b as i8 as i16 + cin as i16;
                    assert_eq!(c.a(), wide as u8);
                    assert_eq!(get_flag(&c, CARRY), wide > 0xFF);
                    assert_eq!(get_flag(&c, OVERFLOW), !(-128..=127).contains(&signed));
                    assert_eq!(get_flag(&c, ZERO), wide as u8 == 0);
                    assert_eq!(get_flag(&c, NEGATIVE), wide & 0x80 != 0);
                }
            }
        }
    }

    #[test]
    fn sbc_is_adc_of_complement() {
        let mut cpu = CpuState::new();
        cpu.set_a(0x10);
        set_flag(&mut cpu, CARRY, true);
        sbc(&mut cpu, 0x01);
        assert_eq!(cpu.a(), 0x0F);
        assert!(get_flag(&cpu, CARRY));

        // Borrow: 0x00 - 0x01 with carry set -> 0xFF, carry clear
        cpu.set_a(0x00);
        set_flag(&mut cpu, CARRY, true);
        sbc(&mut cpu, 0x01);
        assert_eq!(cpu.a(), 0xFF);
        assert!(!get_flag(&cpu, CARRY));
    }

    #[test]
    fn compare_sets_carry_unsigned() {
        let mut cpu = CpuState::new();
        compare(&mut cpu, 0x10, 0x10);
        assert!(get_flag(&cpu, CARRY) && get_flag(&cpu, ZERO));
        compare(&mut cpu, 0x01, 0x02);
        assert!(!get_flag(&cpu, CARRY));
        assert!(get_flag(&cpu, NEGATIVE));
    }

    #[test]
    fn rotates_carry_through() {
        let mut cpu = CpuState::new();
        set_flag(&mut cpu, CARRY, true);
        assert_eq!(ror(&mut cpu, 0x02), 0x81);
        assert!(!get_flag(&cpu, CARRY));
        assert_eq!(rol(&mut cpu, 0x80), 0x00);
        assert!(get_flag(&cpu, CARRY));
        assert!(get_flag(&cpu, ZERO));
    }

    #[test]
    fn push_pull_word_round_trip() {
        let mut bus = Bus::cpu();
        for sp in [0xFDu8, 0x80, 0x02] {
            for x in [0x0000u16, 0x00FF, 0x1234, 0xFF00, 0xFFFF] {
                let mut cpu = CpuState::new();
                cpu.set_sp(sp);
                push_word(&mut cpu, &mut bus, x);
                assert_eq!(pop_word(&mut cpu, &mut bus), x);
                assert_eq!(cpu.sp(), sp);
            }
        }
    }

    #[test]
    fn stack_pointer_wraps_within_page() {
        let mut bus = Bus::cpu();
        let mut cpu = CpuState::new();
        cpu.set_sp(0x00);
        push(&mut cpu, &mut bus, 0x42);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(bus.peek(0x0100), 0x42);
        assert_eq!(pop(&mut cpu, &mut bus), 0x42);
        assert_eq!(cpu.sp(), 0x00);

        // High byte lands at the higher address
        cpu.set_sp(0xFD);
        push_word(&mut cpu, &mut bus, 0xBEEF);
        assert_eq!(bus.peek(0x01FD), 0xBE);
        assert_eq!(bus.peek(0x01FC), 0xEF);
    }

    #[test]
    fn plp_clears_break_and_forces_unused() {
        let mut bus = Bus::cpu();
        let mut cpu = CpuState::new();
        push(&mut cpu, &mut bus, 0xFF);
        plp(&mut cpu, &mut bus);
        assert_eq!(cpu.status(), 0xEF);
        push(&mut cpu, &mut bus, 0x00);
        plp(&mut cpu, &mut bus);
        assert_eq!(cpu.status(), UNUSED);
    }

    #[test]
    fn rmw_writes_old_then_new() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut bus = Bus::cpu();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.bind_write_hook(0x0200, move |v| sink.borrow_mut().push(v));
        bus.poke(0x0200, 0x0F);

        let mut cpu = CpuState::new();
        let r = rmw_memory(&mut cpu, &mut bus, 0x0200, |_, v| v.wrapping_add(1));
        assert_eq!(r, 0x10);
        assert_eq!(*seen.borrow(), vec![0x0F, 0x10]);
    }

    #[test]
    fn branch_target_sign_extends() {
        assert_eq!(branch_target(0x8010, 0x02), 0x8012);
        assert_eq!(branch_target(0x8010, 0xFE), 0x800E);
        assert_eq!(branch_target(0x0001, 0x80), 0xFF81);
    }
}
