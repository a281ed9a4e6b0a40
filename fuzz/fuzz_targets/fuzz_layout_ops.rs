#![no_main]

use arbitrary::Arbitrary;
use folio_core::geometry::{Edge, Point};
use folio_layout::{NodeId, PageLayout};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Split { pick: u16, edge: u8 },
    Drop { pick: u16, x: i16, y: i16 },
    Resize { pick: u16, ratio: f64 },
    Remove { pick: u16 },
    Swap { pick: u16 },
    ResizePage { width: u16, height: u16 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    width: u16,
    height: u16,
    ops: Vec<Op>,
}

fn pick(page: &PageLayout, leaves: bool, index: u16) -> Option<NodeId> {
    let ids: Vec<NodeId> = page
        .tree()
        .walk()
        .filter(|(_, node)| node.is_leaf() == leaves)
        .map(|(_, node)| node.id())
        .collect();
    if ids.is_empty() {
        return None;
    }
    Some(ids[usize::from(index) % ids.len()])
}

fuzz_target!(|input: Input| {
    let mut page = PageLayout::new(u32::from(input.width), u32::from(input.height));
    for op in input.ops.iter().take(256) {
        page = match *op {
            Op::Split { pick: index, edge } => match pick(&page, true, index) {
                Some(target) => {
                    let edge = Edge::ALL[usize::from(edge) % Edge::ALL.len()];
                    page.split_node(target, edge, "block")
                }
                None => page,
            },
            Op::Drop { pick: index, x, y } => match pick(&page, true, index) {
                Some(target) => {
                    let pointer = Point::new(f64::from(x), f64::from(y));
                    page.drop_component(target, pointer, "block")
                }
                None => page,
            },
            Op::Resize { pick: index, ratio } => match pick(&page, false, index) {
                Some(split) => page.resize_split(split, ratio),
                None => page,
            },
            Op::Remove { pick: index } => match pick(&page, true, index) {
                Some(node) => page.remove_node(node),
                None => page,
            },
            Op::Swap { pick: index } => match pick(&page, false, index) {
                Some(split) => page.swap_children(split),
                None => page,
            },
            Op::ResizePage { width, height } => {
                page.resize_page(u32::from(width), u32::from(height))
            }
        };

        // Post-conditions that must always hold:
        let geometry = page.layout();
        assert_eq!(geometry.leaves().len(), page.tree().leaf_count());
        for split in geometry.splits() {
            let ratio = split.ratio.get();
            assert!((0.1..=0.9).contains(&ratio), "ratio {ratio} escaped clamp");
        }
    }

    let restored = PageLayout::from_config(page.to_config()).expect("own snapshot is valid");
    assert_eq!(restored, page);
});
