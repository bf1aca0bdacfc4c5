//! Channel list codec
//!
//! Channel parameters travel as space separated channel numbers, e.g.
//! `"3 5 12"`. Internally they are a 16-bit mask where bit `i` stands for
//! channel `i + 1`.
//!
//! A channel number of `0` means "all channels": as soon as one is seen the
//! rest of the input is ignored and [`ALL_CHANNELS`] is returned. Any token
//! containing something other than ASCII digits aborts the whole decode
//! with [`NO_CHANNELS`], which callers must read as "nothing to apply".

/// Number of channels a mask can address
pub const CHANNEL_COUNT: u8 = 16;

/// Mask with every channel selected
pub const ALL_CHANNELS: u16 = 0xFFFF;

/// Empty mask, doubling as the parse failure sentinel
pub const NO_CHANNELS: u16 = 0x0000;

/// Decode a channel list into a mask.
///
/// Numbers above [`CHANNEL_COUNT`] select nothing.
pub fn decode(text: &str) -> u16 {
    let mut mask = NO_CHANNELS;

    for token in text.split_ascii_whitespace() {
        let mut channel: u32 = 0;
        for c in token.bytes() {
            if !c.is_ascii_digit() {
                return NO_CHANNELS;
            }
            channel = channel
                .saturating_mul(10)
                .saturating_add(u32::from(c - b'0'));
        }

        if channel == 0 {
            return ALL_CHANNELS;
        }

        if channel <= u32::from(CHANNEL_COUNT) {
            mask |= 1 << (channel - 1);
        }
    }

    mask
}

/// Iterate the 1-based channel numbers selected by `mask`, lowest first
pub fn channels(mask: u16) -> impl Iterator<Item = u8> {
    (0..CHANNEL_COUNT).filter(move |bit| mask & (1 << bit) != 0).map(|bit| bit + 1)
}

/// Encode a mask back into a channel list (`0x0005` -> `"1 3"`).
///
/// An empty mask encodes to an empty string.
pub fn encode(mask: u16) -> String {
    channels(mask)
        .map(|ch| ch.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
