// Position value multipliers.
//
// The static modifier discounts positions whose in-season replacement level
// is close to their draft value (QB, K, DEF). The dynamic modifier reads the
// roster's slot occupancy and encodes the order in which slot types should
// be filled: starters first, RB into the flex, bench depth, and kickers and
// defenses strictly last.

use crate::draft::pick::{Position, Slot};
use crate::draft::roster::{SlotOccupancy, SlotSchedule};

/// Number of BN/RB picks that still carry the higher bench multiplier.
pub const RB_BENCH_PREMIUM_PICKS: usize = 2;

/// Slots that must all be full before kickers and defenses gain any value.
const NON_SPECIALIST_SLOTS: &[Slot] = &[
    Slot::Quarterback,
    Slot::RunningBack,
    Slot::WideReceiver,
    Slot::TightEnd,
    Slot::Flex,
    Slot::BenchRunningBack,
    Slot::BenchWideReceiver,
];

/// Fixed per-position multiplier.
pub fn static_position_modifier(position: Position) -> f64 {
    match position {
        Position::Quarterback => 0.05,
        Position::RunningBack => 1.0,
        Position::WideReceiver => 1.0,
        Position::TightEnd => 1.0,
        Position::Kicker => 0.05,
        Position::Defense => 0.05,
    }
}

/// Occupancy-dependent multiplier.
pub fn dynamic_position_modifier(
    position: Position,
    occupancy: &SlotOccupancy,
    schedule: &SlotSchedule,
) -> f64 {
    let open = |slot: Slot| occupancy.is_open(slot, schedule);

    match position {
        Position::RunningBack => {
            if open(Slot::RunningBack) {
                1.0
            } else if open(Slot::Flex) {
                0.9
            } else if open(Slot::BenchRunningBack) {
                if occupancy.filled(Slot::BenchRunningBack) < RB_BENCH_PREMIUM_PICKS {
                    0.125
                } else {
                    0.1
                }
            } else {
                0.0
            }
        }
        Position::WideReceiver => {
            if open(Slot::WideReceiver) {
                0.925
            } else if open(Slot::Flex) {
                // Flex goes to RB/TE.
                0.0
            } else if open(Slot::BenchWideReceiver) {
                0.1
            } else {
                0.0
            }
        }
        Position::TightEnd => {
            if open(Slot::TightEnd) {
                1.0
            } else if open(Slot::Flex) {
                0.9
            } else if open(Slot::BenchWideReceiver) {
                0.05
            } else {
                0.0
            }
        }
        Position::Quarterback => {
            if open(Slot::Quarterback) {
                1.0
            } else {
                0.0
            }
        }
        Position::Kicker | Position::Defense => {
            if NON_SPECIALIST_SLOTS.iter().any(|&slot| open(slot)) {
                0.0
            } else {
                1.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn schedule(entries: &[(Slot, usize)]) -> SlotSchedule {
        SlotSchedule::new(entries.iter().copied().collect())
    }

    fn occupancy(entries: &[(Slot, usize)]) -> SlotOccupancy {
        SlotOccupancy::from_counts(entries.iter().copied().collect::<HashMap<_, _>>())
    }

    fn full_league() -> SlotSchedule {
        schedule(&[
            (Slot::Quarterback, 1),
            (Slot::RunningBack, 2),
            (Slot::WideReceiver, 2),
            (Slot::TightEnd, 1),
            (Slot::Flex, 1),
            (Slot::BenchRunningBack, 3),
            (Slot::BenchWideReceiver, 2),
            (Slot::Kicker, 1),
            (Slot::Defense, 1),
        ])
    }

    #[test]
    fn static_modifiers_fixed_per_position() {
        assert_eq!(static_position_modifier(Position::Quarterback), 0.05);
        assert_eq!(static_position_modifier(Position::RunningBack), 1.0);
        assert_eq!(static_position_modifier(Position::WideReceiver), 1.0);
        assert_eq!(static_position_modifier(Position::TightEnd), 1.0);
        assert_eq!(static_position_modifier(Position::Kicker), 0.05);
        assert_eq!(static_position_modifier(Position::Defense), 0.05);
        // Repeated calls agree
        for _ in 0..3 {
            assert_eq!(static_position_modifier(Position::Kicker), 0.05);
        }
    }

    #[test]
    fn rb_modifier_boundaries() {
        let s = full_league();
        let rb = |occ: &[(Slot, usize)]| {
            dynamic_position_modifier(Position::RunningBack, &occupancy(occ), &s)
        };

        // Primary RB: one below capacity, then at capacity
        assert_eq!(rb(&[(Slot::RunningBack, 1)]), 1.0);
        assert_eq!(rb(&[(Slot::RunningBack, 2)]), 0.9);

        // Flex: one below, then at capacity
        assert_eq!(rb(&[(Slot::RunningBack, 2), (Slot::Flex, 0)]), 0.9);
        assert_eq!(rb(&[(Slot::RunningBack, 2), (Slot::Flex, 1)]), 0.125);

        // RB bench premium for the first two bench picks
        let bench = |n| rb(&[(Slot::RunningBack, 2), (Slot::Flex, 1), (Slot::BenchRunningBack, n)]);
        assert_eq!(bench(0), 0.125);
        assert_eq!(bench(1), 0.125);
        assert_eq!(bench(2), 0.1);
        assert_eq!(bench(3), 0.0);
    }

    #[test]
    fn wr_defers_flex_to_rb() {
        let s = full_league();
        let wr = |occ: &[(Slot, usize)]| {
            dynamic_position_modifier(Position::WideReceiver, &occupancy(occ), &s)
        };
        assert_eq!(wr(&[(Slot::WideReceiver, 1)]), 0.925);
        assert_eq!(wr(&[(Slot::WideReceiver, 2)]), 0.0);
        assert_eq!(wr(&[(Slot::WideReceiver, 2), (Slot::Flex, 1)]), 0.1);
        assert_eq!(
            wr(&[(Slot::WideReceiver, 2), (Slot::Flex, 1), (Slot::BenchWideReceiver, 1)]),
            0.1
        );
        assert_eq!(
            wr(&[(Slot::WideReceiver, 2), (Slot::Flex, 1), (Slot::BenchWideReceiver, 2)]),
            0.0
        );
    }

    #[test]
    fn te_uses_flex_then_wr_bench() {
        let s = full_league();
        let te = |occ: &[(Slot, usize)]| {
            dynamic_position_modifier(Position::TightEnd, &occupancy(occ), &s)
        };
        assert_eq!(te(&[]), 1.0);
        assert_eq!(te(&[(Slot::TightEnd, 1)]), 0.9);
        assert_eq!(te(&[(Slot::TightEnd, 1), (Slot::Flex, 1)]), 0.05);
        assert_eq!(
            te(&[(Slot::TightEnd, 1), (Slot::Flex, 1), (Slot::BenchWideReceiver, 2)]),
            0.0
        );
    }

    #[test]
    fn qb_has_no_bench_value() {
        let s = full_league();
        assert_eq!(
            dynamic_position_modifier(Position::Quarterback, &occupancy(&[]), &s),
            1.0
        );
        assert_eq!(
            dynamic_position_modifier(Position::Quarterback, &occupancy(&[(Slot::Quarterback, 1)]), &s),
            0.0
        );
    }

    #[test]
    fn kicker_and_defense_wait_for_every_other_slot() {
        let s = full_league();
        let almost = occupancy(&[
            (Slot::Quarterback, 1),
            (Slot::RunningBack, 2),
            (Slot::WideReceiver, 2),
            (Slot::TightEnd, 1),
            (Slot::Flex, 1),
            (Slot::BenchRunningBack, 3),
            (Slot::BenchWideReceiver, 1),
        ]);
        assert_eq!(dynamic_position_modifier(Position::Kicker, &almost, &s), 0.0);
        assert_eq!(dynamic_position_modifier(Position::Defense, &almost, &s), 0.0);

        let done = occupancy(&[
            (Slot::Quarterback, 1),
            (Slot::RunningBack, 2),
            (Slot::WideReceiver, 2),
            (Slot::TightEnd, 1),
            (Slot::Flex, 1),
            (Slot::BenchRunningBack, 3),
            (Slot::BenchWideReceiver, 2),
        ]);
        assert_eq!(dynamic_position_modifier(Position::Kicker, &done, &s), 1.0);
        assert_eq!(dynamic_position_modifier(Position::Defense, &done, &s), 1.0);
    }
}
