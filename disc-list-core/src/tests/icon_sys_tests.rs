use super::*;

// -- Test helpers --

fn put_f32(buf: &mut [u8], offset: usize, values: [f32; 3]) {
    for (i, v) in values.iter().enumerate() {
        buf[offset + i * 4..offset + i * 4 + 4].copy_from_slice(&v.to_le_bytes());
    }
}

/// A 964-byte icon.sys with a two-line title.
fn make_icon_sys(title0: &[u8], title1: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 964];
    data[..4].copy_from_slice(b"PS2D");
    data[SPLIT_OFFSET..SPLIT_OFFSET + 2].copy_from_slice(&(title0.len() as u16).to_le_bytes());
    data[BG_ALPHA_OFFSET] = 0x40;
    for (i, off) in BG_COLOR_OFFSETS.iter().enumerate() {
        data[*off] = 10 * i as u8;
        data[*off + 4] = 20;
        data[*off + 8] = 127;
    }
    put_f32(&mut data, 0x50, [0.5, 0.0, -0.25]);
    put_f32(&mut data, 0x60, [0.0, 1.0, 0.0]);
    put_f32(&mut data, 0x70, [-0.5, -0.5, 0.75]);
    put_f32(&mut data, 0x80, [1.0, 0.5, 0.0]);
    put_f32(&mut data, 0x90, [2.0, -1.0, 0.25]);
    put_f32(&mut data, 0xA0, [0.0, 0.0, 0.0]);
    put_f32(&mut data, 0xB0, [0.25, 0.25, 0.25]);
    data[TITLE_OFFSET..TITLE_OFFSET + title0.len()].copy_from_slice(title0);
    let second = TITLE_OFFSET + title0.len();
    data[second..second + title1.len()].copy_from_slice(title1);
    data
}

#[test]
fn test_decodes_fields() {
    let data = make_icon_sys(b"Gran Turismo", b"4");
    let icon = parse_icon_sys(&data).unwrap();
    assert_eq!(icon.title0, "Gran Turismo");
    assert_eq!(icon.title1, "4");
    assert_eq!(icon.bg_alpha, 0x40);
    assert_eq!(icon.bg_colors[0], [0, 20, 127]);
    assert_eq!(icon.bg_colors[3], [30, 20, 127]);
    assert_eq!(icon.light_dirs[0], [0.5, 0.0, -0.25]);
    assert_eq!(icon.light_colors[0], [127, 64, 0]);
    assert_eq!(icon.light_colors[1], [127, 0, 32]);
    assert_eq!(icon.ambient, [32, 32, 32]);
}

#[test]
fn test_shift_jis_title_is_nfkc_normalized() {
    // Full-width "ＡＢ" followed by a full-width space
    let title0 = [0x82, 0x60, 0x82, 0x61, 0x81, 0x40];
    let data = make_icon_sys(&title0, b"");
    let icon = parse_icon_sys(&data).unwrap();
    assert_eq!(icon.title0, "AB");
    assert_eq!(icon.title1, "");
}

#[test]
fn test_katakana_title_survives() {
    // ゲーム
    let title0 = [0x83, 0x51, 0x81, 0x5B, 0x83, 0x80];
    let icon = parse_icon_sys(&make_icon_sys(&title0, b"")).unwrap();
    assert_eq!(icon.title0, "ゲーム");
}

#[test]
fn test_split_offset_past_block_is_clamped() {
    let mut data = make_icon_sys(b"Long Title", b"");
    data[SPLIT_OFFSET..SPLIT_OFFSET + 2].copy_from_slice(&500u16.to_le_bytes());
    let icon = parse_icon_sys(&data).unwrap();
    assert_eq!(icon.title0, "Long Title");
    assert_eq!(icon.title1, "");
}

#[test]
fn test_rejects_missing_magic() {
    let mut data = make_icon_sys(b"Game", b"");
    data[..4].copy_from_slice(b"PS2X");
    assert!(matches!(
        parse_icon_sys(&data),
        Err(ImageError::InvalidFormat(_))
    ));
    assert!(matches!(parse_icon_sys(b"PS"), Err(ImageError::InvalidFormat(_))));
}

#[test]
fn test_rejects_truncated_input() {
    let data = make_icon_sys(b"Game", b"");
    match parse_icon_sys(&data[..0x100]) {
        Err(ImageError::TooSmall { expected, actual }) => {
            assert_eq!(expected, MIN_ICON_SYS_LEN as u64);
            assert_eq!(actual, 0x100);
        }
        other => panic!("expected TooSmall, got {:?}", other),
    }
}

#[test]
fn test_light_scaling() {
    assert_eq!(scale_light(0.0), 0);
    assert_eq!(scale_light(1.0), 127);
    assert_eq!(scale_light(5.0), 127);
    assert_eq!(scale_light(-0.5), 0);
    assert_eq!(scale_light(f32::NAN), 0);
}

#[test]
fn test_renders_icon_txt() {
    let data = make_icon_sys(b"Gran Turismo", b"4");
    let text = parse_icon_sys(&data).unwrap().to_icon_txt();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "PS2X",
            "title0=Gran Turismo",
            "title1=4",
            "bgcola=64",
            "bgcol0=0,20,127",
            "bgcol1=10,20,127",
            "bgcol2=20,20,127",
            "bgcol3=30,20,127",
            "lightdir0=0.5000,0.0000,-0.2500",
            "lightdir1=0.0000,1.0000,0.0000",
            "lightdir2=-0.5000,-0.5000,0.7500",
            "lightcolamb=32,32,32",
            "lightcol0=127,64,0",
            "lightcol1=127,0,32",
            "lightcol2=0,0,0",
            "uninstallmes0=",
            "uninstallmes1=",
            "uninstallmes2=",
        ]
    );
    assert!(!text.ends_with('\n'));
}
