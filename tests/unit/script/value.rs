use super::*;

#[test]
fn truthiness() {
    for v in [
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::Num(0.0),
        Value::Num(f64::NAN),
        Value::from(""),
    ] {
        assert!(!v.truthy(), "{v:?}");
    }
    for v in [
        Value::Bool(true),
        Value::Num(-1.0),
        Value::from("0"),
        Value::array(vec![]),
        Value::object(vec![]),
    ] {
        assert!(v.truthy(), "{v:?}");
    }
}

#[test]
fn numeric_coercion() {
    assert_eq!(Value::from(" 12.5 ").to_number(), 12.5);
    assert_eq!(Value::from("").to_number(), 0.0);
    assert_eq!(Value::from("0x1f").to_number(), 31.0);
    assert!(Value::from("12px").to_number().is_nan());
    assert!(Value::from("inf").to_number().is_nan());
    assert_eq!(Value::from("-Infinity").to_number(), f64::NEG_INFINITY);
    assert_eq!(Value::Bool(true).to_number(), 1.0);
    assert_eq!(Value::Null.to_number(), 0.0);
    assert!(Value::Undefined.to_number().is_nan());
    assert_eq!(Value::array(vec![Value::Num(7.0)]).to_number(), 7.0);
    assert!(Value::array(vec![Value::Num(1.0), Value::Num(2.0)]).to_number().is_nan());
}

#[test]
fn number_formatting() {
    assert_eq!(format_number(3.0), "3");
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(format_number(1e21), "1e+21");
}

#[test]
fn equality() {
    let a = Value::array(vec![]);
    assert!(strict_eq(&a, &a.clone()));
    assert!(!strict_eq(&a, &Value::array(vec![])));
    assert!(!strict_eq(&Value::Num(f64::NAN), &Value::Num(f64::NAN)));
    assert!(!strict_eq(&Value::Num(1.0), &Value::from("1")));

    assert!(loose_eq(&Value::Num(1.0), &Value::from("1")));
    assert!(loose_eq(&Value::Null, &Value::Undefined));
    assert!(!loose_eq(&Value::Null, &Value::Num(0.0)));
    assert!(loose_eq(&Value::Bool(true), &Value::Num(1.0)));
}

#[test]
fn display() {
    let nested = Value::array(vec![
        Value::Num(1.0),
        Value::array(vec![Value::from("a"), Value::Null]),
        Value::Undefined,
        Value::Bool(true),
    ]);
    assert_eq!(to_display(&nested).unwrap(), "1,a,,,true");
    assert_eq!(to_display(&Value::object(vec![])).unwrap(), "[object Object]");
}

#[test]
fn display_of_cyclic_array_terminates() {
    let a = Value::array(vec![Value::Num(1.0)]);
    if let Value::Array(rc) = &a {
        rc.borrow_mut().0.push(a.clone());
    }
    let s = to_display(&a).unwrap();
    assert!(s.starts_with("1,1,1"));
    assert!(s.ends_with("..."));
    // Break the cycle so the test does not leak.
    if let Value::Array(rc) = &a {
        rc.borrow_mut().0.clear();
    }
}

#[test]
fn display_is_capped() {
    let big = Value::from("x".repeat(600 * 1024));
    let arr = Value::array(vec![big.clone(), big]);
    assert_eq!(to_display(&arr), Err(TooLong));
}

#[test]
fn deeply_nested_containers_drop_without_recursion() {
    let mut v = Value::array(vec![]);
    for i in 0..1_000_000 {
        v = if i % 2 == 0 {
            Value::array(vec![v])
        } else {
            Value::object(vec![(Rc::from("k"), v)])
        };
    }
    drop(v);
}

#[test]
fn object_set_and_get() {
    let mut o = Obj::default();
    assert!(o.set(Rc::from("x"), Value::Num(1.0)));
    assert!(!o.set(Rc::from("x"), Value::Num(2.0)));
    assert!(matches!(o.get("x"), Some(Value::Num(n)) if *n == 2.0));
    assert!(o.get("y").is_none());
    o.set(Rc::from("y"), Value::Null);
    o.set(Rc::from("x"), Value::Null);
    let keys: Vec<&str> = o.0.keys().map(|k| &**k).collect();
    assert_eq!(keys, ["x", "y"]);
}
