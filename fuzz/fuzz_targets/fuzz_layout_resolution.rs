#![no_main]

use arbitrary::Arbitrary;
use blocks_core::{Breakpoint, BreakpointTable};
use blocks_modal::{BreakpointOverrides, ModalLayout};
use libfuzzer_sys::fuzz_target;

const LAYOUTS: [ModalLayout; 4] = [
    ModalLayout::Center,
    ModalLayout::Left,
    ModalLayout::Right,
    ModalLayout::BottomSheet,
];

#[derive(Debug, Arbitrary)]
struct Input {
    widths: [u16; 6],
    rules: Vec<(u8, u8)>,
    base: u8,
    width: u32,
}

fuzz_target!(|input: Input| {
    let mut table = BreakpointTable::default();
    for (bp, w) in Breakpoint::ALL.into_iter().zip(input.widths) {
        table = table.with(bp, u32::from(w));
    }
    let rules: Vec<(Breakpoint, ModalLayout)> = input
        .rules
        .iter()
        .take(32)
        .map(|&(b, l)| {
            (
                Breakpoint::ALL[usize::from(b) % Breakpoint::ALL.len()],
                LAYOUTS[usize::from(l) % LAYOUTS.len()],
            )
        })
        .collect();
    let base = LAYOUTS[usize::from(input.base) % LAYOUTS.len()];

    let overrides = BreakpointOverrides::new(&rules, &table);
    let resolved = overrides.resolve(base, input.width);

    // Sorted ascending, one entry per breakpoint.
    let entries: Vec<_> = overrides.iter().collect();
    assert!(entries.windows(2).all(|w| w[0].1 <= w[1].1));
    assert!(entries.len() <= Breakpoint::ALL.len());

    match entries.iter().find(|(_, w, _)| input.width <= *w) {
        Some(&(_, _, layout)) => assert_eq!(resolved, layout),
        None => assert_eq!(resolved, base),
    }
});
