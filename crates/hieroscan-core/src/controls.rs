//! Unicode format controls for Egyptian hieroglyphs and the handful of
//! signs that the layout rules treat specially.

/// Vertical joiner.
pub const VER: char = '\u{13430}';
/// Horizontal joiner.
pub const HOR: char = '\u{13431}';
/// Insert at top start.
pub const TS: char = '\u{13432}';
/// Insert at bottom start.
pub const BS: char = '\u{13433}';
/// Insert at top end.
pub const TE: char = '\u{13434}';
/// Insert at bottom end.
pub const BE: char = '\u{13435}';
pub const BEGIN: char = '\u{13437}';
pub const END: char = '\u{13438}';
/// Insert in the middle.
pub const M: char = '\u{13439}';
/// Insert at top.
pub const T: char = '\u{1343A}';
/// Insert at bottom.
pub const B: char = '\u{1343B}';
pub const BEGIN_ENCL: char = '\u{1343C}';
pub const END_ENCL: char = '\u{1343D}';
pub const CART_OPEN: char = '\u{13379}';
pub const CART_CLOSE: char = '\u{1337A}';

/// Shaded placeholders for damaged text.
pub const FULL_LOST: char = '\u{13443}';
pub const TALL_LOST: char = '\u{13445}';
pub const WIDE_LOST: char = '\u{13446}';

pub const D12: char = '\u{13082}';
pub const N5: char = '\u{131F3}';
pub const N33: char = '\u{13212}';
pub const N33A: char = '\u{13213}';
pub const N35: char = '\u{13216}';
pub const N35A: char = '\u{13217}';
/// Cartouche shape; with a middle insertion it becomes an enclosure.
pub const V10: char = '\u{13377}';
pub const Z1: char = '\u{133E4}';
pub const Z2: char = '\u{133E5}';
pub const Z3: char = '\u{133EA}';
pub const Z4: char = '\u{133ED}';
pub const Z4A: char = '\u{133EE}';
pub const Z5: char = '\u{133EF}';
pub const Z5A: char = '\u{133F0}';
pub const Z13: char = '\u{133F8}';
pub const Z14: char = '\u{133F9}';

/// Short readable name of a structural format control.
pub fn control_name(c: char) -> Option<&'static str> {
    let name = match c {
        VER => "VER",
        HOR => "HOR",
        TS => "TS",
        BS => "BS",
        TE => "TE",
        BE => "BE",
        BEGIN => "BEGIN",
        END => "END",
        M => "M",
        T => "T",
        B => "B",
        BEGIN_ENCL => "BEGIN_ENCL",
        END_ENCL => "END_ENCL",
        CART_OPEN => "CART_OPEN",
        CART_CLOSE => "CART_CLOSE",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_are_recognized() {
        assert_eq!(control_name(HOR), Some("HOR"));
        assert_eq!(control_name(CART_CLOSE), Some("CART_CLOSE"));
        assert_eq!(control_name(Z1), None);
        assert_eq!(control_name('\u{13000}'), None);
        assert_eq!(control_name(VER), Some("VER"));
        assert_eq!(control_name(BEGIN_ENCL), Some("BEGIN_ENCL"));
    }
}
