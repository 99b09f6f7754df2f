/// Number of bits needed to encode any offset in `[0, span]`.
/// A span of zero needs no bits at all.
pub fn bits_for_range(span: u32) -> u32 {
    u32::BITS - span.leading_zeros()
}
