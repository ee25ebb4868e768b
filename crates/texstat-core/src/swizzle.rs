//! Channel swizzles
//!
//! A [`Swizzle`] picks, for every destination channel, which source channel
//! (or constant) feeds it. Constants are expressed in the storage format's
//! own units, so callers pass the format's "zero" and "one" when applying.

/// Source selector for one destination channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwizzleComponent {
    /// Source red channel
    R,
    /// Source green channel
    G,
    /// Source blue channel
    B,
    /// Source alpha channel
    A,
    /// Constant zero
    Zero,
    /// Constant one (255 for 8-bit normalized data)
    One,
}

/// Ordered 4-tuple of channel selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swizzle {
    pub r: SwizzleComponent,
    pub g: SwizzleComponent,
    pub b: SwizzleComponent,
    pub a: SwizzleComponent,
}

impl Default for Swizzle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Swizzle {
    /// Pass every channel through unchanged.
    pub const IDENTITY: Swizzle = Swizzle::new(
        SwizzleComponent::R,
        SwizzleComponent::G,
        SwizzleComponent::B,
        SwizzleComponent::A,
    );

    /// Create a swizzle from four selectors.
    pub const fn new(
        r: SwizzleComponent,
        g: SwizzleComponent,
        b: SwizzleComponent,
        a: SwizzleComponent,
    ) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a swizzle from a four-character pattern such as `"bgra"`,
    /// `"rrr1"` or `"rgb0"`.
    ///
    /// Returns `None` if the pattern is not exactly four characters from
    /// `r`, `g`, `b`, `a`, `0`, `1` (case-insensitive).
    pub fn parse(pattern: &str) -> Option<Self> {
        let mut sel = [SwizzleComponent::Zero; 4];
        let mut n = 0;
        for c in pattern.chars() {
            if n == 4 {
                return None;
            }
            sel[n] = match c.to_ascii_lowercase() {
                'r' => SwizzleComponent::R,
                'g' => SwizzleComponent::G,
                'b' => SwizzleComponent::B,
                'a' => SwizzleComponent::A,
                '0' => SwizzleComponent::Zero,
                '1' => SwizzleComponent::One,
                _ => return None,
            };
            n += 1;
        }
        (n == 4).then(|| Self::new(sel[0], sel[1], sel[2], sel[3]))
    }

    /// True if every channel selects itself.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Apply the swizzle to one raw texel.
    ///
    /// `zero` and `one` are the constant values in the texel's own units.
    #[inline]
    pub fn apply<T: Copy>(&self, texel: [T; 4], zero: T, one: T) -> [T; 4] {
        let pick = |c: SwizzleComponent| match c {
            SwizzleComponent::R => texel[0],
            SwizzleComponent::G => texel[1],
            SwizzleComponent::B => texel[2],
            SwizzleComponent::A => texel[3],
            SwizzleComponent::Zero => zero,
            SwizzleComponent::One => one,
        };
        [pick(self.r), pick(self.g), pick(self.b), pick(self.a)]
    }
}
