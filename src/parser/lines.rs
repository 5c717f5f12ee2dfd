//! Line reconstruction: clusters blocks into lines by vertical position.

use crate::model::{Block, Line};

/// Groups blocks into [`Line`]s using a vertical tolerance.
///
/// Blocks are visited in the order given. A block joins the current line
/// when its `y` lies within `tolerance` of the line's first block and it sits
/// on the same page; otherwise it opens a new line. A difference of exactly
/// `tolerance` does not merge.
#[derive(Debug, Clone, Copy)]
pub struct LineReconstructor {
    tolerance: f32,
}

impl LineReconstructor {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Group a block sequence into lines.
    pub fn group(&self, blocks: Vec<Block>) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut current: Vec<Block> = Vec::new();
        let mut anchor: Option<(u32, f32)> = None;

        for block in blocks {
            let opens_line = match anchor {
                Some((page, y)) => block.page != page || (block.y - y).abs() > self.tolerance,
                None => true,
            };

            if opens_line {
                if !current.is_empty() {
                    lines.push(Line::from_blocks(std::mem::take(&mut current)));
                }
                anchor = Some((block.page, block.y));
            }
            current.push(block);
        }

        if !current.is_empty() {
            lines.push(Line::from_blocks(current));
        }

        lines
    }

    /// Flatten already-built lines back into blocks and group them again.
    pub fn regroup(&self, lines: &[Line]) -> Vec<Line> {
        let blocks = lines
            .iter()
            .flat_map(|line| line.blocks().iter().cloned())
            .collect();
        self.group(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str, x: f32, y: f32) -> Block {
        Block::new(text, 10.0, "Helvetica", x, y)
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text()).collect()
    }

    #[test]
    fn test_groups_within_tolerance() {
        let lines = LineReconstructor::new(5.0).group(vec![
            block("Doe", 60.0, 100.0),
            block("Jane", 10.0, 102.0),
            block("Education", 10.0, 130.0),
        ]);
        assert_eq!(texts(&lines), vec!["Jane Doe", "Education"]);
    }

    #[test]
    fn test_exact_tolerance_does_not_merge() {
        let lines = LineReconstructor::new(5.0).group(vec![
            block("a", 0.0, 100.0),
            block("b", 0.0, 105.0),
        ]);
        assert_eq!(lines.len(), 2);

        let lines = LineReconstructor::new(1.5).group(vec![
            block("a", 0.0, 10.0),
            block("b", 0.0, 11.5),
        ]);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_first_block_opens_line() {
        let lines = LineReconstructor::new(5.0).group(vec![block("only", 0.0, 0.0)]);
        assert_eq!(texts(&lines), vec!["only"]);
        assert!(LineReconstructor::new(5.0).group(vec![]).is_empty());
    }

    #[test]
    fn test_page_change_opens_line() {
        let lines = LineReconstructor::new(5.0).group(vec![
            block("end of page one", 0.0, -50.0),
            block("start of page two", 0.0, -50.0).on_page(2),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].page(), 2);
    }

    #[test]
    fn test_deterministic() {
        let input = vec![
            block("x", 5.0, 1.0),
            block("y", 1.0, 3.0),
            block("z", 0.0, 9.0),
        ];
        let r = LineReconstructor::new(5.0);
        assert_eq!(r.group(input.clone()), r.group(input));
    }

    #[test]
    fn test_regroup_with_tighter_tolerance() {
        let coarse = LineReconstructor::new(5.0).group(vec![
            block("Post-Graduate Software development", 0.0, 10.0),
            block("(2024)", 0.0, 11.0),
            block("Saskatchewan Polytechnic", 0.0, 13.0),
        ]);
        assert_eq!(coarse.len(), 1);

        let fine = LineReconstructor::new(1.5).regroup(&coarse);
        assert_eq!(fine.len(), 2);
        assert_eq!(fine[1].text(), "Saskatchewan Polytechnic");
    }
}
