//! Content stream rewriting for band redaction
//!
//! Walks a decoded page content stream tracking the graphics and text
//! state, removes text-showing operators whose baseline falls inside the
//! redaction band, and produces the clip/fill operator sequences that
//! complete the redaction.
//!
//! Only the state that influences the baseline position is tracked:
//! `q`/`Q`/`cm` for the CTM and `BT`/`Tm`/`Td`/`TD`/`TL`/`T*` for the
//! text matrices. Horizontal advances from shown text are ignored — they
//! never change the baseline y, and subsequent positioning operators
//! restart from the line matrix.

use lopdf::content::Operation;
use lopdf::Object;
use tracing::trace;

use crate::config::FillColor;
use crate::geometry::{Matrix, Rect};

/// Result of filtering one page's operations.
#[derive(Debug)]
pub(crate) struct FilterOutcome {
    pub operations: Vec<Operation>,
    /// Number of text-showing operators removed.
    pub removed_ops: usize,
}

/// Removes text-showing operators whose baseline lies inside `band`.
///
/// The positioning side effects of `'` and `"` are preserved by emitting
/// the equivalent state operators in their place, so text later on the
/// page keeps its position.
pub(crate) fn strip_band_text(operations: Vec<Operation>, band: &Rect) -> FilterOutcome {
    let mut state = StreamState::new();
    let mut kept = Vec::with_capacity(operations.len());
    let mut removed_ops = 0;

    for op in operations {
        match op.operator.as_str() {
            "q" => {
                state.save();
                kept.push(op);
            }
            "Q" => {
                state.restore();
                kept.push(op);
            }
            "cm" => {
                state.concat_ctm(&op.operands);
                kept.push(op);
            }
            "BT" => {
                state.begin_text();
                kept.push(op);
            }
            "Tm" => {
                state.set_text_matrix(&op.operands);
                kept.push(op);
            }
            "Td" => {
                state.next_line_offset(&op.operands);
                kept.push(op);
            }
            "TD" => {
                // Td with the leading set to -ty.
                if let Some(ty) = operand_f64(op.operands.get(1)) {
                    state.leading = -ty;
                }
                state.next_line_offset(&op.operands);
                kept.push(op);
            }
            "TL" => {
                if let Some(l) = operand_f64(op.operands.first()) {
                    state.leading = l;
                }
                kept.push(op);
            }
            "T*" => {
                state.next_line();
                kept.push(op);
            }
            "Tj" | "TJ" => {
                if state.baseline_in(band) {
                    trace!(operator = %op.operator, "dropping text in band");
                    removed_ops += 1;
                } else {
                    kept.push(op);
                }
            }
            "'" => {
                state.next_line();
                if state.baseline_in(band) {
                    removed_ops += 1;
                    kept.push(Operation::new("T*", vec![]));
                } else {
                    kept.push(op);
                }
            }
            "\"" => {
                state.next_line();
                if state.baseline_in(band) {
                    removed_ops += 1;
                    // Keep the spacing and line-advance side effects.
                    if let Some(aw) = op.operands.first() {
                        kept.push(Operation::new("Tw", vec![aw.clone()]));
                    }
                    if let Some(ac) = op.operands.get(1) {
                        kept.push(Operation::new("Tc", vec![ac.clone()]));
                    }
                    kept.push(Operation::new("T*", vec![]));
                } else {
                    kept.push(op);
                }
            }
            _ => kept.push(op),
        }
    }

    FilterOutcome {
        operations: kept,
        removed_ops,
    }
}

/// Operators that clip subsequent content to the region above the band.
///
/// Must be paired with a closing `Q` after the page's original content.
/// When the band covers the whole page the clip region is empty and all
/// original content is discarded by the viewer.
pub(crate) fn clip_above_band(band: &Rect, media_box: &Rect) -> Vec<Operation> {
    let keep = band.above(media_box);
    vec![
        Operation::new("q", vec![]),
        rect_op(&keep),
        Operation::new("W", vec![]),
        Operation::new("n", vec![]),
    ]
}

/// Operators that paint the opaque fill over the band, state-isolated.
pub(crate) fn fill_band(band: &Rect, fill: &FillColor) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "rg",
            vec![real(fill.r), real(fill.g), real(fill.b)],
        ),
        rect_op(band),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ]
}

fn rect_op(rect: &Rect) -> Operation {
    Operation::new(
        "re",
        vec![
            real(rect.x0),
            real(rect.y0),
            real(rect.width()),
            real(rect.height()),
        ],
    )
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn operand_f64(obj: Option<&Object>) -> Option<f64> {
    match obj {
        Some(Object::Integer(i)) => Some(*i as f64),
        Some(Object::Real(r)) => Some(*r as f64),
        _ => None,
    }
}

/// The graphics/text state needed to locate text baselines.
struct StreamState {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f64,
}

impl StreamState {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
        }
    }

    fn save(&mut self) {
        self.ctm_stack.push(self.ctm);
    }

    fn restore(&mut self) {
        if let Some(ctm) = self.ctm_stack.pop() {
            self.ctm = ctm;
        }
    }

    fn concat_ctm(&mut self, operands: &[Object]) {
        if let Some(m) = matrix_from(operands) {
            self.ctm = m.multiply(&self.ctm);
        }
    }

    fn begin_text(&mut self) {
        self.text_matrix = Matrix::IDENTITY;
        self.line_matrix = Matrix::IDENTITY;
    }

    fn set_text_matrix(&mut self, operands: &[Object]) {
        if let Some(m) = matrix_from(operands) {
            self.text_matrix = m;
            self.line_matrix = m;
        }
    }

    fn next_line_offset(&mut self, operands: &[Object]) {
        let tx = operand_f64(operands.first()).unwrap_or(0.0);
        let ty = operand_f64(operands.get(1)).unwrap_or(0.0);
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.line_matrix = Matrix::translation(0.0, -self.leading).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// Whether the current text baseline origin lands inside the band.
    ///
    /// Only the device-space y coordinate matters: the band always spans
    /// the full page width.
    fn baseline_in(&self, band: &Rect) -> bool {
        if band.is_degenerate() {
            return false;
        }
        let (_, y) = self.text_matrix.multiply(&self.ctm).apply(0.0, 0.0);
        y >= band.y0 && y < band.y1
    }
}

fn matrix_from(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    Some(Matrix::new(
        operand_f64(operands.first())?,
        operand_f64(operands.get(1))?,
        operand_f64(operands.get(2))?,
        operand_f64(operands.get(3))?,
        operand_f64(operands.get(4))?,
        operand_f64(operands.get(5))?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    fn show_text_at(x: f64, y: f64, text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    text.as_bytes().to_vec(),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ]
    }

    fn band() -> Rect {
        Rect::new(0.0, 0.0, 792.0, 60.0)
    }

    fn count_ops(ops: &[Operation], operator: &str) -> usize {
        ops.iter().filter(|op| op.operator == operator).count()
    }

    fn numbers(op: &Operation) -> Vec<f64> {
        op.operands
            .iter()
            .map(|o| operand_f64(Some(o)).expect("numeric operand"))
            .collect()
    }

    #[test]
    fn drops_text_inside_band() {
        let mut ops = show_text_at(100.0, 32.0, "page 1 of 9");
        ops.extend(show_text_at(100.0, 500.0, "body"));

        let outcome = strip_band_text(ops, &band());
        assert_eq!(outcome.removed_ops, 1);
        assert_eq!(count_ops(&outcome.operations, "Tj"), 1);
    }

    #[test]
    fn keeps_text_above_band() {
        let ops = show_text_at(100.0, 112.0, "body");
        let outcome = strip_band_text(ops, &band());
        assert_eq!(outcome.removed_ops, 0);
        assert_eq!(count_ops(&outcome.operations, "Tj"), 1);
    }

    #[test]
    fn tracks_tm_positioning() {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tm",
                vec![
                    real(1.0),
                    real(0.0),
                    real(0.0),
                    real(1.0),
                    real(50.0),
                    real(20.0),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(b"footer".to_vec(), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ];
        let outcome = strip_band_text(ops, &band());
        assert_eq!(outcome.removed_ops, 1);
        assert_eq!(count_ops(&outcome.operations, "Tj"), 0);
    }

    #[test]
    fn tracks_ctm_translation() {
        // Text at y=500 in a coordinate system shifted down by 470 lands
        // at device y=30, inside the band.
        let mut ops = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(1.0),
                    real(0.0),
                    real(0.0),
                    real(1.0),
                    real(0.0),
                    real(-470.0),
                ],
            ),
        ];
        ops.extend(show_text_at(100.0, 500.0, "footer"));
        ops.push(Operation::new("Q", vec![]));

        let outcome = strip_band_text(ops, &band());
        assert_eq!(outcome.removed_ops, 1);
    }

    #[test]
    fn ctm_restored_by_q() {
        let mut ops = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(1.0),
                    real(0.0),
                    real(0.0),
                    real(1.0),
                    real(0.0),
                    real(-470.0),
                ],
            ),
            Operation::new("Q", vec![]),
        ];
        ops.extend(show_text_at(100.0, 500.0, "body"));

        let outcome = strip_band_text(ops, &band());
        assert_eq!(outcome.removed_ops, 0);
    }

    #[test]
    fn apostrophe_keeps_line_advance() {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("TL", vec![real(14.0)]),
            Operation::new("Td", vec![real(100.0), real(70.0)]),
            // First line at y=56 (inside), second at y=42 (inside).
            Operation::new(
                "'",
                vec![Object::String(b"one".to_vec(), StringFormat::Literal)],
            ),
            Operation::new(
                "'",
                vec![Object::String(b"two".to_vec(), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ];
        let outcome = strip_band_text(ops, &band());
        assert_eq!(outcome.removed_ops, 2);
        // Each dropped ' leaves a T* so positioning still advances.
        assert_eq!(count_ops(&outcome.operations, "T*"), 2);
        assert_eq!(count_ops(&outcome.operations, "'"), 0);
    }

    #[test]
    fn double_quote_preserves_spacing_operators() {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("TL", vec![real(12.0)]),
            Operation::new("Td", vec![real(100.0), real(50.0)]),
            Operation::new(
                "\"",
                vec![
                    real(1.5),
                    real(0.5),
                    Object::String(b"footer".to_vec(), StringFormat::Literal),
                ],
            ),
            Operation::new("ET", vec![]),
        ];
        let outcome = strip_band_text(ops, &band());
        assert_eq!(outcome.removed_ops, 1);
        assert_eq!(count_ops(&outcome.operations, "Tw"), 1);
        assert_eq!(count_ops(&outcome.operations, "Tc"), 1);
        assert_eq!(count_ops(&outcome.operations, "T*"), 1);
    }

    #[test]
    fn degenerate_band_removes_nothing() {
        let ops = show_text_at(100.0, 5.0, "x");
        let empty = Rect::new(0.0, 0.0, 792.0, 0.0);
        let outcome = strip_band_text(ops, &empty);
        assert_eq!(outcome.removed_ops, 0);
    }

    #[test]
    fn clip_and_fill_shapes() {
        let mb = Rect::new(0.0, 0.0, 792.0, 612.0);
        let b = band();

        let clip = clip_above_band(&b, &mb);
        assert_eq!(clip[0].operator, "q");
        assert_eq!(clip[1].operator, "re");
        assert_eq!(numbers(&clip[1]), vec![0.0, 60.0, 792.0, 552.0]);
        assert_eq!(clip[2].operator, "W");
        assert_eq!(clip[3].operator, "n");

        let fill = fill_band(&b, &FillColor::WHITE);
        assert_eq!(fill[1].operator, "rg");
        assert_eq!(numbers(&fill[1]), vec![1.0, 1.0, 1.0]);
        assert_eq!(numbers(&fill[2]), vec![0.0, 0.0, 792.0, 60.0]);
        assert_eq!(fill[3].operator, "f");
    }
}
