// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! sjasmplus pseudo-instructions.
//!
//! Fake instructions are compound forms the assembler expands into a short
//! sequence of real instructions. Register lists (`PUSH AF,BC,DE`) and
//! negated conditions (`JP !Z,label`) are source rewrites handled here too.

use super::negate_condition;

/// A fake instruction and the real instructions it assembles to.
#[derive(Debug, Clone, Copy)]
pub struct FakeInstruction {
    pub instruction: &'static str,
    pub expansion: &'static [&'static str],
}

const fn fake(instruction: &'static str, expansion: &'static [&'static str]) -> FakeInstruction {
    FakeInstruction {
        instruction,
        expansion,
    }
}

pub static FAKE_INSTRUCTIONS: &[FakeInstruction] = &[
    // 16-bit register pair moves
    fake("LD BC,DE", &["LD B,D", "LD C,E"]),
    fake("LD BC,HL", &["LD B,H", "LD C,L"]),
    fake("LD DE,BC", &["LD D,B", "LD E,C"]),
    fake("LD DE,HL", &["LD D,H", "LD E,L"]),
    fake("LD HL,BC", &["LD H,B", "LD L,C"]),
    fake("LD HL,DE", &["LD H,D", "LD L,E"]),
    fake("LD BC,IX", &["LD B,IXH", "LD C,IXL"]),
    fake("LD IX,BC", &["LD IXH,B", "LD IXL,C"]),
    fake("LD BC,IY", &["LD B,IYH", "LD C,IYL"]),
    fake("LD IY,BC", &["LD IYH,B", "LD IYL,C"]),
    fake("LD DE,IX", &["LD D,IXH", "LD E,IXL"]),
    fake("LD IX,DE", &["LD IXH,D", "LD IXL,E"]),
    fake("LD DE,IY", &["LD D,IYH", "LD E,IYL"]),
    fake("LD IY,DE", &["LD IYH,D", "LD IYL,E"]),
    fake("LD HL,IX", &["PUSH IX", "POP HL"]),
    fake("LD HL,IY", &["PUSH IY", "POP HL"]),
    fake("LD IX,HL", &["PUSH HL", "POP IX"]),
    fake("LD IY,HL", &["PUSH HL", "POP IY"]),
    fake("LD IX,IY", &["PUSH IY", "POP IX"]),
    fake("LD IY,IX", &["PUSH IX", "POP IY"]),
    // 16-bit rotates and shifts
    fake("RL BC", &["RL C", "RL B"]),
    fake("RR BC", &["RR B", "RR C"]),
    fake("SLA BC", &["SLA C", "RL B"]),
    fake("SLL BC", &["SLL C", "RL B"]),
    fake("SLI BC", &["SLL C", "RL B"]),
    fake("SRA BC", &["SRA B", "RR C"]),
    fake("SRL BC", &["SRL B", "RR C"]),
    fake("RL DE", &["RL E", "RL D"]),
    fake("RR DE", &["RR D", "RR E"]),
    fake("SLA DE", &["SLA E", "RL D"]),
    fake("SLL DE", &["SLL E", "RL D"]),
    fake("SLI DE", &["SLL E", "RL D"]),
    fake("SRA DE", &["SRA D", "RR E"]),
    fake("SRL DE", &["SRL D", "RR E"]),
    fake("RL HL", &["RL L", "RL H"]),
    fake("RR HL", &["RR H", "RR L"]),
    fake("SLA HL", &["ADD HL,HL"]),
    fake("SLL HL", &["SLL L", "RL H"]),
    fake("SLI HL", &["SLL L", "RL H"]),
    fake("SRA HL", &["SRA H", "RR L"]),
    fake("SRL HL", &["SRL H", "RR L"]),
    // Subtraction without carry
    fake("SUB HL,BC", &["OR A", "SBC HL,BC"]),
    fake("SUB HL,DE", &["OR A", "SBC HL,DE"]),
    fake("SUB HL,HL", &["OR A", "SBC HL,HL"]),
    fake("SUB HL,SP", &["OR A", "SBC HL,SP"]),
    // 16-bit loads through memory
    fake("LD BC,(HL)", &["LD C,(HL)", "INC HL", "LD B,(HL)", "DEC HL"]),
    fake("LD (HL),BC", &["LD (HL),C", "INC HL", "LD (HL),B", "DEC HL"]),
    fake("LD DE,(HL)", &["LD E,(HL)", "INC HL", "LD D,(HL)", "DEC HL"]),
    fake("LD (HL),DE", &["LD (HL),E", "INC HL", "LD (HL),D", "DEC HL"]),
    fake("LD BC,(IX+o)", &["LD C,(IX+o)", "LD B,(IX+o+1)"]),
    fake("LD (IX+o),BC", &["LD (IX+o),C", "LD (IX+o+1),B"]),
    fake("LD DE,(IX+o)", &["LD E,(IX+o)", "LD D,(IX+o+1)"]),
    fake("LD (IX+o),DE", &["LD (IX+o),E", "LD (IX+o+1),D"]),
    fake("LD HL,(IX+o)", &["LD L,(IX+o)", "LD H,(IX+o+1)"]),
    fake("LD (IX+o),HL", &["LD (IX+o),L", "LD (IX+o+1),H"]),
    fake("LD BC,(IY+o)", &["LD C,(IY+o)", "LD B,(IY+o+1)"]),
    fake("LD (IY+o),BC", &["LD (IY+o),C", "LD (IY+o+1),B"]),
    fake("LD DE,(IY+o)", &["LD E,(IY+o)", "LD D,(IY+o+1)"]),
    fake("LD (IY+o),DE", &["LD (IY+o),E", "LD (IY+o+1),D"]),
    fake("LD HL,(IY+o)", &["LD L,(IY+o)", "LD H,(IY+o+1)"]),
    fake("LD (IY+o),HL", &["LD (IY+o),L", "LD (IY+o+1),H"]),
    // Loads with pointer post-increment and post-decrement
    fake("LDI A,(HL)", &["LD A,(HL)", "INC HL"]),
    fake("LDI B,(HL)", &["LD B,(HL)", "INC HL"]),
    fake("LDI C,(HL)", &["LD C,(HL)", "INC HL"]),
    fake("LDI D,(HL)", &["LD D,(HL)", "INC HL"]),
    fake("LDI E,(HL)", &["LD E,(HL)", "INC HL"]),
    fake("LDI H,(HL)", &["LD H,(HL)", "INC HL"]),
    fake("LDI L,(HL)", &["LD L,(HL)", "INC HL"]),
    fake("LDI (HL),A", &["LD (HL),A", "INC HL"]),
    fake("LDI (HL),B", &["LD (HL),B", "INC HL"]),
    fake("LDI (HL),C", &["LD (HL),C", "INC HL"]),
    fake("LDI (HL),D", &["LD (HL),D", "INC HL"]),
    fake("LDI (HL),E", &["LD (HL),E", "INC HL"]),
    fake("LDI (HL),H", &["LD (HL),H", "INC HL"]),
    fake("LDI (HL),L", &["LD (HL),L", "INC HL"]),
    fake("LDI (HL),n", &["LD (HL),n", "INC HL"]),
    fake("LDI A,(BC)", &["LD A,(BC)", "INC BC"]),
    fake("LDI (BC),A", &["LD (BC),A", "INC BC"]),
    fake("LDI A,(DE)", &["LD A,(DE)", "INC DE"]),
    fake("LDI (DE),A", &["LD (DE),A", "INC DE"]),
    fake("LDI A,(IX+o)", &["LD A,(IX+o)", "INC IX"]),
    fake("LDI B,(IX+o)", &["LD B,(IX+o)", "INC IX"]),
    fake("LDI C,(IX+o)", &["LD C,(IX+o)", "INC IX"]),
    fake("LDI D,(IX+o)", &["LD D,(IX+o)", "INC IX"]),
    fake("LDI E,(IX+o)", &["LD E,(IX+o)", "INC IX"]),
    fake("LDI H,(IX+o)", &["LD H,(IX+o)", "INC IX"]),
    fake("LDI L,(IX+o)", &["LD L,(IX+o)", "INC IX"]),
    fake("LDI (IX+o),A", &["LD (IX+o),A", "INC IX"]),
    fake("LDI (IX+o),B", &["LD (IX+o),B", "INC IX"]),
    fake("LDI (IX+o),C", &["LD (IX+o),C", "INC IX"]),
    fake("LDI (IX+o),D", &["LD (IX+o),D", "INC IX"]),
    fake("LDI (IX+o),E", &["LD (IX+o),E", "INC IX"]),
    fake("LDI (IX+o),H", &["LD (IX+o),H", "INC IX"]),
    fake("LDI (IX+o),L", &["LD (IX+o),L", "INC IX"]),
    fake("LDI (IX+o),n", &["LD (IX+o),n", "INC IX"]),
    fake("LDI A,(IY+o)", &["LD A,(IY+o)", "INC IY"]),
    fake("LDI B,(IY+o)", &["LD B,(IY+o)", "INC IY"]),
    fake("LDI C,(IY+o)", &["LD C,(IY+o)", "INC IY"]),
    fake("LDI D,(IY+o)", &["LD D,(IY+o)", "INC IY"]),
    fake("LDI E,(IY+o)", &["LD E,(IY+o)", "INC IY"]),
    fake("LDI H,(IY+o)", &["LD H,(IY+o)", "INC IY"]),
    fake("LDI L,(IY+o)", &["LD L,(IY+o)", "INC IY"]),
    fake("LDI (IY+o),A", &["LD (IY+o),A", "INC IY"]),
    fake("LDI (IY+o),B", &["LD (IY+o),B", "INC IY"]),
    fake("LDI (IY+o),C", &["LD (IY+o),C", "INC IY"]),
    fake("LDI (IY+o),D", &["LD (IY+o),D", "INC IY"]),
    fake("LDI (IY+o),E", &["LD (IY+o),E", "INC IY"]),
    fake("LDI (IY+o),H", &["LD (IY+o),H", "INC IY"]),
    fake("LDI (IY+o),L", &["LD (IY+o),L", "INC IY"]),
    fake("LDI (IY+o),n", &["LD (IY+o),n", "INC IY"]),
    fake("LDI BC,(HL)", &["LD C,(HL)", "INC HL", "LD B,(HL)", "INC HL"]),
    fake("LDI (HL),BC", &["LD (HL),C", "INC HL", "LD (HL),B", "INC HL"]),
    fake("LDI DE,(HL)", &["LD E,(HL)", "INC HL", "LD D,(HL)", "INC HL"]),
    fake("LDI (HL),DE", &["LD (HL),E", "INC HL", "LD (HL),D", "INC HL"]),
    fake("LDD A,(HL)", &["LD A,(HL)", "DEC HL"]),
    fake("LDD B,(HL)", &["LD B,(HL)", "DEC HL"]),
    fake("LDD C,(HL)", &["LD C,(HL)", "DEC HL"]),
    fake("LDD D,(HL)", &["LD D,(HL)", "DEC HL"]),
    fake("LDD E,(HL)", &["LD E,(HL)", "DEC HL"]),
    fake("LDD H,(HL)", &["LD H,(HL)", "DEC HL"]),
    fake("LDD L,(HL)", &["LD L,(HL)", "DEC HL"]),
    fake("LDD (HL),A", &["LD (HL),A", "DEC HL"]),
    fake("LDD (HL),B", &["LD (HL),B", "DEC HL"]),
    fake("LDD (HL),C", &["LD (HL),C", "DEC HL"]),
    fake("LDD (HL),D", &["LD (HL),D", "DEC HL"]),
    fake("LDD (HL),E", &["LD (HL),E", "DEC HL"]),
    fake("LDD (HL),H", &["LD (HL),H", "DEC HL"]),
    fake("LDD (HL),L", &["LD (HL),L", "DEC HL"]),
    fake("LDD (HL),n", &["LD (HL),n", "DEC HL"]),
    fake("LDD A,(BC)", &["LD A,(BC)", "DEC BC"]),
    fake("LDD (BC),A", &["LD (BC),A", "DEC BC"]),
    fake("LDD A,(DE)", &["LD A,(DE)", "DEC DE"]),
    fake("LDD (DE),A", &["LD (DE),A", "DEC DE"]),
    fake("LDD A,(IX+o)", &["LD A,(IX+o)", "DEC IX"]),
    fake("LDD B,(IX+o)", &["LD B,(IX+o)", "DEC IX"]),
    fake("LDD C,(IX+o)", &["LD C,(IX+o)", "DEC IX"]),
    fake("LDD D,(IX+o)", &["LD D,(IX+o)", "DEC IX"]),
    fake("LDD E,(IX+o)", &["LD E,(IX+o)", "DEC IX"]),
    fake("LDD H,(IX+o)", &["LD H,(IX+o)", "DEC IX"]),
    fake("LDD L,(IX+o)", &["LD L,(IX+o)", "DEC IX"]),
    fake("LDD (IX+o),A", &["LD (IX+o),A", "DEC IX"]),
    fake("LDD (IX+o),B", &["LD (IX+o),B", "DEC IX"]),
    fake("LDD (IX+o),C", &["LD (IX+o),C", "DEC IX"]),
    fake("LDD (IX+o),D", &["LD (IX+o),D", "DEC IX"]),
    fake("LDD (IX+o),E", &["LD (IX+o),E", "DEC IX"]),
    fake("LDD (IX+o),H", &["LD (IX+o),H", "DEC IX"]),
    fake("LDD (IX+o),L", &["LD (IX+o),L", "DEC IX"]),
    fake("LDD (IX+o),n", &["LD (IX+o),n", "DEC IX"]),
    fake("LDD A,(IY+o)", &["LD A,(IY+o)", "DEC IY"]),
    fake("LDD B,(IY+o)", &["LD B,(IY+o)", "DEC IY"]),
    fake("LDD C,(IY+o)", &["LD C,(IY+o)", "DEC IY"]),
    fake("LDD D,(IY+o)", &["LD D,(IY+o)", "DEC IY"]),
    fake("LDD E,(IY+o)", &["LD E,(IY+o)", "DEC IY"]),
    fake("LDD H,(IY+o)", &["LD H,(IY+o)", "DEC IY"]),
    fake("LDD L,(IY+o)", &["LD L,(IY+o)", "DEC IY"]),
    fake("LDD (IY+o),A", &["LD (IY+o),A", "DEC IY"]),
    fake("LDD (IY+o),B", &["LD (IY+o),B", "DEC IY"]),
    fake("LDD (IY+o),C", &["LD (IY+o),C", "DEC IY"]),
    fake("LDD (IY+o),D", &["LD (IY+o),D", "DEC IY"]),
    fake("LDD (IY+o),E", &["LD (IY+o),E", "DEC IY"]),
    fake("LDD (IY+o),H", &["LD (IY+o),H", "DEC IY"]),
    fake("LDD (IY+o),L", &["LD (IY+o),L", "DEC IY"]),
    fake("LDD (IY+o),n", &["LD (IY+o),n", "DEC IY"]),
    fake("LDD BC,(HL)", &["LD C,(HL)", "DEC HL", "LD B,(HL)", "DEC HL"]),
    fake("LDD (HL),BC", &["LD (HL),C", "DEC HL", "LD (HL),B", "DEC HL"]),
    fake("LDD DE,(HL)", &["LD E,(HL)", "DEC HL", "LD D,(HL)", "DEC HL"]),
    fake("LDD (HL),DE", &["LD (HL),E", "DEC HL", "LD (HL),D", "DEC HL"]),
];

/// Mnemonics that accept a register list.
const REGISTER_LIST_MNEMONICS: &[&str] = &["PUSH", "POP", "INC", "DEC"];

/// Split `PUSH AF,BC` into one instruction per register. Returns `None`
/// unless the mnemonic takes a list and more than one operand is given.
pub fn split_register_list(mnemonic: &str, operands: &[String]) -> Option<Vec<String>> {
    if operands.len() < 2 || !REGISTER_LIST_MNEMONICS.contains(&mnemonic) {
        return None;
    }
    if operands.iter().any(|operand| operand.is_empty()) {
        return None;
    }
    Some(
        operands
            .iter()
            .map(|operand| format!("{mnemonic} {operand}"))
            .collect(),
    )
}

/// Mnemonics whose first operand may be a condition.
const CONDITIONAL_MNEMONICS: &[&str] = &["JP", "JR", "CALL", "RET"];

/// Rewrite `JP !Z,label` as `JP NZ,label`.
pub fn rewrite_negated_condition(mnemonic: &str, operands: &[String]) -> Option<String> {
    if !CONDITIONAL_MNEMONICS.contains(&mnemonic) {
        return None;
    }
    let (first, rest) = operands.split_first()?;
    let negated = negate_condition(first.strip_prefix('!')?)?;
    let mut rewritten = format!("{mnemonic} {negated}");
    for operand in rest {
        rewritten.push(',');
        rewritten.push_str(operand);
    }
    Some(rewritten)
}
