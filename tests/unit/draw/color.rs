use super::*;

fn css(ch: &[f64]) -> String {
    Rgba::from_channels(ch).unwrap().to_css()
}

#[test]
fn channel_counts_normalize_to_distinct_forms() {
    let gray = css(&[255.0]);
    let gray_alpha = css(&[255.0, 128.0]);
    let rgb = css(&[10.0, 20.0, 30.0]);
    let rgba = css(&[10.0, 20.0, 30.0, 128.0]);

    assert_eq!(gray, "rgb(255,255,255)");
    assert_eq!(gray_alpha, "rgba(255,255,255,0.502)");
    assert_eq!(rgb, "rgb(10,20,30)");
    assert_eq!(rgba, "rgba(10,20,30,0.502)");

    let all = [&gray, &gray_alpha, &rgb, &rgba];
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn channels_are_clamped_and_rounded() {
    assert_eq!(css(&[-10.0, 300.0, 12.6]), "rgb(0,255,13)");
    assert_eq!(css(&[f64::NAN]), "rgb(0,0,0)");
    assert_eq!(css(&[0.0, 0.0]), "rgba(0,0,0,0)");
}

#[test]
fn unsupported_channel_count_is_none() {
    assert!(Rgba::from_channels(&[]).is_none());
    assert!(Rgba::from_channels(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
}

#[test]
fn parse_accepts_hex_and_functional_forms() {
    assert_eq!(Rgba::parse("#ff8000"), Some(Rgba::new(255.0, 128.0, 0.0, 255.0)));
    assert_eq!(Rgba::parse("#F80"), Some(Rgba::new(255.0, 136.0, 0.0, 255.0)));
    assert_eq!(
        Rgba::parse("#00000080"),
        Some(Rgba::new(0.0, 0.0, 0.0, 128.0))
    );
    assert_eq!(
        Rgba::parse("rgb(1, 2, 3)"),
        Some(Rgba::new(1.0, 2.0, 3.0, 255.0))
    );
    assert_eq!(
        Rgba::parse("rgba(10,20,30,0.502)"),
        Some(Rgba::new(10.0, 20.0, 30.0, 128.0))
    );
    assert!(Rgba::parse("tomato").is_none());
    assert!(Rgba::parse("#12345").is_none());
    assert!(Rgba::parse("rgb(1,2)").is_none());
}

#[test]
fn canonical_strings_round_trip_through_parse() {
    for ch in [
        &[0.0][..],
        &[90.0, 200.0],
        &[1.0, 2.0, 3.0],
        &[4.0, 5.0, 6.0, 7.0],
    ] {
        let c = Rgba::from_channels(ch).unwrap();
        assert_eq!(Rgba::parse(&c.to_css()).unwrap().to_css(), c.to_css());
    }
}

#[test]
fn lerp_color_mixes_channels() {
    assert_eq!(
        lerp_color("rgb(0,0,0)", "rgb(255,255,255)", 0.5).as_deref(),
        Some("rgb(128,128,128)")
    );
    assert_eq!(
        lerp_color("#ff0000", "#0000ff", 0.0).as_deref(),
        Some("rgb(255,0,0)")
    );
    assert_eq!(
        lerp_color("#ff0000", "#0000ff", 7.0).as_deref(),
        Some("rgb(0,0,255)")
    );
    assert!(lerp_color("red", "blue", 0.5).is_none());
}
