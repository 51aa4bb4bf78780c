/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use i8080::config::Config;
use i8080::disassembler::{Disassembler, Entry};
use i8080::opcode::{DecodeError, OpCode};
use i8080::proc_state::{
    DataBus, Fault, Flags, InterceptableProc8080, Memory, NoPorts, Proc8080, Registers, State,
};

use proptest::prelude::*;

fn load(program: &[u8]) -> Proc8080 {
    let mut memory = Memory::default();
    memory.load(program, 0).unwrap();
    Proc8080::without_ports(memory)
}

#[test]
fn nop_changes_nothing_but_pc() {
    let mut cpu = load(&[0x00]);
    cpu.registers_mut().b = 0x12;
    let before = cpu.registers().clone();

    cpu.emulate();

    assert_eq!(cpu.registers(), &Registers { pc: 1, ..before });
    assert_eq!(cpu.flags(), &Flags::default());
}

#[test]
fn immediate_load() {
    let mut cpu = load(&[0x06, 0x2a]);

    cpu.emulate();

    assert_eq!(cpu.registers().b, 0x2a);
    assert_eq!(cpu.registers().pc, 2);
}

#[test]
fn absolute_jump() {
    let mut cpu = load(&[0xc3, 0x34, 0x12]);

    cpu.emulate();

    assert_eq!(cpu.registers().pc, 0x1234);
}

#[test]
fn overflowing_add_sets_carries() {
    // MVI A,$8f ; ADI $81
    let mut cpu = load(&[0x3e, 0x8f, 0xc6, 0x81]);

    cpu.run(Some(2));

    assert_eq!(cpu.registers().a, 0x10);
    assert_eq!(
        cpu.flags(),
        &Flags { cy: true, ac: true, z: false, s: false, p: false }
    );
}

#[test]
fn truncated_jump_is_reported_by_both_paths() {
    let mut memory = Memory::default();
    memory.load(&[0xc3, 0x34], 0xfffe).unwrap();
    let mut cpu = Proc8080::without_ports(memory);
    cpu.reset(0xfffe);

    let expected = DecodeError::IncompleteInstruction {
        address: 0xfffe,
        opcode: 0xc3,
        needed: 3,
        available: 2,
    };
    assert_eq!(cpu.emulate(), State::Faulted(Fault::IncompleteInstruction(expected)));
    assert_eq!(cpu.registers().pc, 0xfffe);

    let entries: Vec<Entry> = Disassembler::new(&cpu.memory().as_slice()[0xfffe..])
        .with_base(0xfffe)
        .collect();
    assert_eq!(
        entries,
        [Entry::Incomplete {
            address: 0xfffe,
            bytes: &[0xc3, 0x34],
            error: DecodeError::IncompleteInstruction {
                address: 0,
                opcode: 0xc3,
                needed: 3,
                available: 2,
            },
        }]
    );
}

#[test]
fn subroutine_loop() {
    // Sums 5 + 4 + 3 + 2 + 1 into A through a subroutine.
    let program = [
        0x31, 0x00, 0x20, // 0000 LXI SP,$2000
        0x06, 0x05,       // 0003 MVI B,5
        0xaf,             // 0005 XRA A
        0xcd, 0x0e, 0x00, // 0006 CALL $000e
        0x05,             // 0009 DCR B
        0xc2, 0x06, 0x00, // 000a JNZ $0006
        0x76,             // 000d HLT
        0x80,             // 000e ADD B
        0xc9,             // 000f RET
    ];
    let mut cpu = load(&program);

    let summary = cpu.run(Some(1000));

    assert_eq!(summary.state, State::Halted);
    assert_eq!(cpu.registers().a, 15);
    assert_eq!(cpu.registers().b, 0);
    assert_eq!(cpu.registers().sp, 0x2000);
    assert_eq!(cpu.registers().pc, 0x000e);
}

#[test]
fn memory_through_hl() {
    let program = [
        0x21, 0x00, 0x30, // LXI H,$3000
        0x36, 0x41,       // MVI M,$41
        0x34,             // INR M
        0x7e,             // MOV A,M
        0x23,             // INX H
        0x77,             // MOV M,A
        0x76,             // HLT
    ];
    let mut cpu = load(&program);

    cpu.run(None);

    assert_eq!(cpu.memory().read(0x3000), 0x42);
    assert_eq!(cpu.memory().read(0x3001), 0x42);
    assert_eq!(cpu.registers().hl(), 0x3001);
}

#[test]
fn undocumented_call_alias() {
    // 0xdd behaves like CALL
    let program = [
        0x31, 0x00, 0x20, // LXI SP,$2000
        0xdd, 0x08, 0x00, // CALL $0008
        0x76,             // HLT
        0x00,
        0x3c,             // 0008 INR A
        0xd9,             // RET (undocumented alias)
    ];
    let mut cpu = load(&program);

    assert_eq!(cpu.run(Some(10)).state, State::Halted);
    assert_eq!(cpu.registers().a, 1);
    assert_eq!(cpu.registers().pc, 0x0007);
}

#[test]
fn gap_opcodes_execute_as_nop() {
    for opcode in [0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38] {
        let mut cpu = load(&[opcode]);
        *cpu.registers_mut() =
            Registers { a: 0x11, b: 0x22, h: 0x33, sp: 0x4000, ..Default::default() };
        let before = cpu.registers().clone();

        assert_eq!(cpu.emulate(), State::Running);
        assert_eq!(cpu.registers(), &Registers { pc: 1, ..before });
        assert_eq!(cpu.flags(), &Flags::default());
    }
}

#[test]
fn undocumented_jump_alias() {
    let mut cpu = load(&[0xcb, 0x34, 0x12]);

    assert_eq!(cpu.emulate(), State::Running);
    assert_eq!(cpu.registers().pc, 0x1234);
}

#[test]
fn faulting_step_is_not_counted() {
    let mut memory = Memory::new(2);
    memory.load(&[0x00, 0xc3], 0).unwrap();
    let mut cpu = Proc8080::without_ports(memory);

    let summary = cpu.run(None);
    assert_eq!(summary.steps, 1);
    assert!(matches!(summary.state, State::Faulted(Fault::IncompleteInstruction(_))));
}

#[test]
fn intercepted_run_counts_like_a_plain_run() {
    let mut memory = Memory::new(2);
    memory.load(&[0x00, 0xc3], 0).unwrap();
    let mut seen = 0;
    let mut interceptable = InterceptableProc8080::from_8080(
        Proc8080::without_ports(memory),
        |_: &mut Proc8080, _: &OpCode| -> bool {
            seen += 1;
            false
        },
    );

    let summary = interceptable.run(Some(10));
    assert_eq!(summary.steps, 1);
    assert!(matches!(interceptable.state(), State::Faulted(_)));
    drop(interceptable);
    assert_eq!(seen, 1);
}

#[derive(Default)]
struct Echo {
    input: u8,
    output: Vec<u8>,
}

impl DataBus for Echo {
    fn read_port(&mut self, port: u8) -> Option<u8> {
        (port == 1).then_some(self.input)
    }

    fn write_port(&mut self, port: u8, value: u8) -> bool {
        if port == 2 {
            self.output.push(value);
        }
        port == 2
    }
}

#[test]
fn ports_are_delegated_to_the_bus() {
    // IN 1 ; ADI 1 ; OUT 2 ; OUT 3 ; IN 4 ; HLT
    let program = [0xdb, 0x01, 0xc6, 0x01, 0xd3, 0x02, 0xd3, 0x03, 0xdb, 0x04, 0x76];
    let config = Config::default().with_port_sentinel(0xee);
    let bus = Echo { input: 0x41, ..Default::default() };
    let mut cpu = Proc8080::from_config(&config, &program, bus).unwrap();

    assert_eq!(cpu.run(None).state, State::Halted);
    assert_eq!(cpu.data_bus().output, vec![0x42]);
    assert_eq!(cpu.registers().a, 0xee);
}

#[test]
fn ports_without_a_handler() {
    // MVI A,$55 ; OUT 1 ; IN 1 ; HLT
    let mut cpu = load(&[0x3e, 0x55, 0xd3, 0x01, 0xdb, 0x01, 0x76]);

    assert_eq!(cpu.run(None).state, State::Halted);
    assert_eq!(cpu.registers().a, 0x00);
}

#[test]
fn small_memory_mirrors_addresses() {
    // LXI H,$1100 ; MVI M,$99 ; HLT
    let config = Config::default().with_memory_size(0x1000);
    let program = [0x21, 0x00, 0x11, 0x36, 0x99, 0x76];
    let mut cpu = Proc8080::from_config(&config, &program, NoPorts).unwrap();

    cpu.run(None);

    assert_eq!(cpu.memory().read(0x0100), 0x99);
    assert_eq!(cpu.memory().read(0x1100), 0x99);
}

#[test]
fn intercepted_bdos_print() {
    let mut program = vec![
        0x11, 0x0c, 0x01, // 0100 LXI D,$010c
        0x0e, 0x09,       // 0103 MVI C,9
        0xcd, 0x05, 0x00, // 0105 CALL $0005
        0x76,             // 0108 HLT
        0x00, 0x00, 0x00,
    ];
    program.extend_from_slice(b"CPU IS OPERATIONAL$");
    let config = Config::default()
        .with_load_address(0x100)
        .with_entry(0x100)
        .with_stack_pointer(0xf000);
    let cpu = Proc8080::from_config(&config, &program, NoPorts).unwrap();

    let mut printed = String::new();
    let mut interceptable = InterceptableProc8080::from_8080(
        cpu,
        |cpu: &mut Proc8080, op: &OpCode| -> bool {
            match *op {
                OpCode::Call(5) if cpu.registers().c == 9 => {
                    let mut addr = cpu.registers().pair(i8080::opcode::Reg16::D);
                    loop {
                        let c = cpu.memory().read(addr);
                        if c == b'$' {
                            break;
                        }
                        printed.push(char::from(c));
                        addr += 1;
                    }
                    true
                }
                _ => false,
            }
        },
    );

    let summary = interceptable.run(Some(100));
    assert_eq!(summary.state, State::Halted);
    assert_eq!(summary.steps, 4);
    assert_eq!(interceptable.registers().sp, 0xf000);
    assert_eq!(interceptable.flags(), &Flags::default());
    assert_eq!(interceptable.processor().memory().read(0xeffe), 0x00);
    let cpu = interceptable.unwrap();
    assert_eq!(cpu.registers().pc, 0x109);
    assert_eq!(printed, "CPU IS OPERATIONAL");
}

proptest! {
    #[test]
    fn increment_then_decrement_restores_registers(
        reg in 0..8u8,
        a in any::<u8>(), b in any::<u8>(), c in any::<u8>(), h in any::<u8>(), l in any::<u8>(),
    ) {
        prop_assume!(reg != 6);
        // INR r ; DCR r
        let program = [0x04 | (reg << 3), 0x05 | (reg << 3)];
        let mut cpu = load(&program);
        *cpu.registers_mut() = Registers { a, b, c, h, l, ..Default::default() };
        let before = cpu.registers().clone();

        cpu.run(Some(2));

        prop_assert_eq!(cpu.registers(), &Registers { pc: 2, ..before });
    }

    #[test]
    fn push_then_pop_restores_the_stack(
        pair in 0..3u8, high in any::<u8>(), low in any::<u8>(), sp in 0x0100..=0xffffu16,
    ) {
        // PUSH rp ; POP rp
        let program = [0xc5 | (pair << 4), 0xc1 | (pair << 4)];
        let mut cpu = load(&program);
        let regs = cpu.registers_mut();
        regs.sp = sp;
        regs.b = high;
        regs.c = low;
        regs.d = high;
        regs.e = low;
        regs.h = high;
        regs.l = low;
        let before = cpu.registers().clone();

        cpu.emulate();
        prop_assert_eq!(cpu.registers().sp, sp.wrapping_sub(2));
        cpu.emulate();

        prop_assert_eq!(cpu.registers(), &Registers { pc: 2, ..before });
    }
}
