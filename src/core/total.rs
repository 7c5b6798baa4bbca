// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Total timing of a block under different control-flow assumptions.

use crate::z80::FlowKind;

use super::meterable::Meterable;
use super::timing::Timings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalKind {
    Default,
    ExecutionFlow,
    AtExit,
}

/// A named total produced by one calculator, decorating the block it was
/// computed from. Size, bytes and leaves are those of the block.
#[derive(Clone, Debug)]
pub struct TotalTiming<'a> {
    pub kind: TotalKind,
    pub name: &'static str,
    pub icon: &'static str,
    pub timings: Timings,
    root: &'a Meterable,
}

impl<'a> TotalTiming<'a> {
    pub fn root(&self) -> &'a Meterable {
        self.root
    }

    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn bytes(&self) -> Vec<String> {
        self.root.bytes()
    }

    pub fn flatten(&self) -> Vec<&'a Meterable> {
        self.root.flatten()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionFlowSettings {
    pub enabled: bool,
    pub threshold: usize,
    pub stop_on_unconditional_jump: bool,
    pub require_conditional: bool,
}

impl Default for ExecutionFlowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 2,
            stop_on_unconditional_jump: true,
            require_conditional: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtExitSettings {
    pub ret: bool,
    pub jp: bool,
    pub call: bool,
    pub threshold: usize,
    pub stop_on_unconditional_jump: bool,
    pub require_conditional: bool,
}

impl Default for AtExitSettings {
    fn default() -> Self {
        Self {
            ret: true,
            jp: true,
            call: false,
            threshold: 1,
            stop_on_unconditional_jump: true,
            require_conditional: true,
        }
    }
}

/// Leaves in source order with their execution counts.
fn leaves(root: &Meterable) -> Vec<(&Meterable, usize)> {
    let mut out = Vec::new();
    root.for_each_leaf(&mut |leaf, times| out.push((leaf, times)));
    out
}

fn leaf_count(leaves: &[(&Meterable, usize)]) -> usize {
    leaves
        .iter()
        .fold(0usize, |acc, (_, times)| acc.saturating_add(*times))
}

fn sum(leaves: &[(&Meterable, usize)], transform: impl Fn(&Meterable) -> Timings) -> Timings {
    leaves
        .iter()
        .fold(Timings::ZERO, |acc, (leaf, times)| acc + transform(leaf).scaled(*times))
}

/// A leaf's cost when execution falls through it.
fn fall_through(leaf: &Meterable) -> Timings {
    if leaf.is_conditional_exit() {
        leaf.timings().when_not_taken()
    } else {
        leaf.timings()
    }
}

/// Plain sum of every leaf.
pub fn default_total(root: &Meterable) -> TotalTiming<'_> {
    let leaves = leaves(root);
    TotalTiming {
        kind: TotalKind::Default,
        name: if leaf_count(&leaves) >= 2 { "Total timing" } else { "Timing" },
        icon: "watch",
        timings: sum(&leaves, Meterable::timings),
        root,
    }
}

/// Sum assuming no conditional jump or return is ever taken.
pub fn execution_flow_total<'a>(
    root: &'a Meterable,
    settings: &ExecutionFlowSettings,
) -> Option<TotalTiming<'a>> {
    if !settings.enabled {
        return None;
    }
    let leaves = leaves(root);
    let count = leaf_count(&leaves);
    if count == 0 || count < settings.threshold {
        return None;
    }
    if settings.stop_on_unconditional_jump
        && leaves.iter().any(|(leaf, _)| leaf.is_unconditional_exit())
    {
        return None;
    }
    if settings.require_conditional {
        let last_conditional = leaves.last().is_some_and(|(leaf, _)| leaf.is_conditional());
        if !last_conditional && !leaves.iter().any(|(leaf, _)| leaf.is_conditional_exit()) {
            return None;
        }
    }

    Some(TotalTiming {
        kind: TotalKind::ExecutionFlow,
        name: "Execution flow",
        icon: "debug-continue",
        timings: sum(&leaves, fall_through),
        root,
    })
}

/// Sum up to the block's final jump, call or return, taking that exit and
/// skipping every earlier conditional one.
pub fn at_exit_total<'a>(root: &'a Meterable, settings: &AtExitSettings) -> Option<TotalTiming<'a>> {
    let leaves = leaves(root);
    let (&(last, last_times), rest) = leaves.split_last()?;
    if leaf_count(&leaves) < settings.threshold {
        return None;
    }
    let (name, icon) = match last.flow()? {
        FlowKind::Ret if settings.ret => ("Timing to exit point (RET)", "debug-step-out"),
        FlowKind::Jump if settings.jp => ("Timing to exit point (JP)", "debug-step-over"),
        FlowKind::Call if settings.call => ("Timing to exit point (CALL)", "debug-step-into"),
        _ => return None,
    };
    // Earlier executions of the final leaf belong to the body.
    let body = || {
        rest.iter()
            .map(|(leaf, _)| *leaf)
            .chain((last_times > 1).then_some(last))
    };
    if settings.stop_on_unconditional_jump && body().any(Meterable::is_unconditional_exit) {
        return None;
    }
    if settings.require_conditional
        && !last.is_conditional()
        && !body().any(Meterable::is_conditional_exit)
    {
        return None;
    }

    let exit = if last.is_conditional() {
        last.timings().when_taken()
    } else {
        last.timings()
    };
    Some(TotalTiming {
        kind: TotalKind::AtExit,
        name,
        icon,
        timings: sum(rest, fall_through) + fall_through(last).scaled(last_times - 1) + exit,
        root,
    })
}

/// At-exit when it applies, else execution flow, else the plain sum.
pub fn best_total<'a>(
    root: &'a Meterable,
    execution_flow: &ExecutionFlowSettings,
    at_exit: &AtExitSettings,
) -> TotalTiming<'a> {
    at_exit_total(root, at_exit)
        .or_else(|| execution_flow_total(root, execution_flow))
        .unwrap_or_else(|| default_total(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::meterable::{Collection, Repeated};
    use crate::core::timing::Timing;
    use crate::z80::OpcodeTable;

    fn block(texts: &[&str]) -> Meterable {
        let table = OpcodeTable::standard();
        Meterable::Collection(
            texts
                .iter()
                .map(|text| {
                    let ins = table
                        .instructions()
                        .iter()
                        .find(|ins| ins.text() == *text)
                        .cloned()
                        .unwrap_or_else(|| panic!("{text}"));
                    Meterable::Instruction(ins)
                })
                .collect::<Collection>(),
        )
    }

    #[test]
    fn default_names_single_and_aggregate() {
        let root = block(&["NOP"]);
        let one = default_total(&root);
        assert_eq!(one.name, "Timing");
        assert_eq!(one.icon, "watch");
        let root = block(&["NOP", "NOP"]);
        let two = default_total(&root);
        assert_eq!(two.name, "Total timing");
        assert_eq!(two.timings.z80, Timing::single(8));
    }

    #[test]
    fn execution_flow_uses_not_taken_branches() {
        let root = block(&["JR Z,e", "NOP"]);
        let total = execution_flow_total(&root, &ExecutionFlowSettings::default()).expect("applies");
        assert_eq!(total.timings.z80, Timing::single(7 + 4));
        assert_eq!(total.timings.msx, Timing::single(8 + 5));
        assert_eq!(total.name, "Execution flow");
    }

    #[test]
    fn execution_flow_respects_threshold_and_exits() {
        let settings = ExecutionFlowSettings::default();
        assert!(execution_flow_total(&block(&["JR Z,e"]), &settings).is_none());
        assert!(execution_flow_total(&block(&["JR Z,e", "RET"]), &settings).is_none());
        assert!(execution_flow_total(&block(&["NOP", "NOP"]), &settings).is_none());
        let relaxed = ExecutionFlowSettings {
            require_conditional: false,
            ..settings
        };
        assert!(execution_flow_total(&block(&["NOP", "NOP"]), &relaxed).is_some());
        let disabled = ExecutionFlowSettings {
            enabled: false,
            ..settings
        };
        assert!(execution_flow_total(&block(&["JR Z,e", "NOP"]), &disabled).is_none());
    }

    #[test]
    fn execution_flow_accepts_trailing_conditional() {
        let root = block(&["NOP", "LDIR"]);
        let total = execution_flow_total(&root, &ExecutionFlowSettings::default()).expect("applies");
        assert_eq!(total.timings.z80, Timing::new(25, 20));
    }

    #[test]
    fn at_exit_takes_final_and_skips_earlier_conditionals() {
        let root = block(&["RET Z", "RET"]);
        let total = at_exit_total(&root, &AtExitSettings::default()).expect("applies");
        assert_eq!(total.timings.z80, Timing::single(5 + 10));
        assert_eq!(total.name, "Timing to exit point (RET)");
        assert_eq!(total.icon, "debug-step-out");

        let root = block(&["NOP", "JR NZ,e"]);
        let total = at_exit_total(&root, &AtExitSettings::default()).expect("applies");
        assert_eq!(total.timings.z80, Timing::single(4 + 12));
        assert_eq!(total.icon, "debug-step-over");
    }

    #[test]
    fn at_exit_toggles_per_exit_kind() {
        let settings = AtExitSettings::default();
        assert!(at_exit_total(&block(&["RET Z", "CALL nn"]), &settings).is_none());
        let with_call = AtExitSettings {
            call: true,
            ..settings
        };
        let root = block(&["RET Z", "CALL nn"]);
        let total = at_exit_total(&root, &with_call).expect("applies");
        assert_eq!(total.name, "Timing to exit point (CALL)");
        assert_eq!(total.timings.z80, Timing::single(5 + 17));
        assert!(at_exit_total(&block(&["RET Z", "NOP"]), &settings).is_none());
    }

    #[test]
    fn at_exit_stops_on_earlier_unconditional_exit() {
        let settings = AtExitSettings::default();
        assert!(at_exit_total(&block(&["RET", "RET Z", "RET"]), &settings).is_none());
        assert!(at_exit_total(&block(&["NOP", "RET"]), &settings).is_none());
    }

    #[test]
    fn repeated_leaves_are_counted_per_execution() {
        let table = OpcodeTable::standard();
        let leaf = |text: &str| {
            table
                .instructions()
                .iter()
                .find(|ins| ins.text() == text)
                .cloned()
                .map(Meterable::Instruction)
                .unwrap_or_else(|| panic!("{text}"))
        };
        let body: Collection = [leaf("NOP"), leaf("RET Z")].into_iter().collect();
        let root = Repeated::wrap(Meterable::Collection(body), 3);

        let total = default_total(&root);
        assert_eq!(total.timings.z80, Timing::new(3 * (4 + 11), 3 * (4 + 5)));
        let flow = execution_flow_total(&root, &ExecutionFlowSettings::default()).expect("applies");
        assert_eq!(flow.timings.z80, Timing::single(3 * (4 + 5)));
        // Only the last RET Z is taken; the two before it fall through.
        let exit = at_exit_total(&root, &AtExitSettings::default()).expect("applies");
        assert_eq!(exit.timings.z80, Timing::single(3 * 4 + 2 * 5 + 11));

        let once = Repeated::wrap(leaf("RET"), 2);
        assert!(at_exit_total(&once, &AtExitSettings::default()).is_none());
    }

    #[test]
    fn huge_repetitions_saturate() {
        let nop = OpcodeTable::standard()
            .by_opcode(0x00)
            .cloned()
            .map(Meterable::Instruction)
            .expect("NOP");
        let inner = Repeated::wrap(nop, 0x10000);
        let root = Repeated::wrap(inner, 0x10000);
        let total = default_total(&root);
        assert_eq!(total.timings.z80, Timing::single(i32::MAX));
        assert_eq!(total.name, "Total timing");
    }

    #[test]
    fn totals_expose_their_block() {
        let root = block(&["LD A,n", "RET Z", "RET"]);
        let total = at_exit_total(&root, &AtExitSettings::default()).expect("applies");
        assert_eq!(total.size(), 4);
        assert_eq!(total.bytes(), vec!["3E", "n", "C8", "C9"]);
        assert_eq!(total.flatten().len(), 3);
    }

    #[test]
    fn best_total_prefers_at_exit() {
        let flow = ExecutionFlowSettings::default();
        let exit = AtExitSettings::default();
        let root = block(&["RET Z", "RET"]);
        assert_eq!(best_total(&root, &flow, &exit).kind, TotalKind::AtExit);
        let root = block(&["JR Z,e", "NOP"]);
        assert_eq!(best_total(&root, &flow, &exit).kind, TotalKind::ExecutionFlow);
        let root = block(&["NOP"]);
        assert_eq!(best_total(&root, &flow, &exit).kind, TotalKind::Default);
    }
}
