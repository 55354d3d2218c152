#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use spigot_core::{AsValue, Value};
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    #[test]
    fn value_bool() {
        let val = true.as_value();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_eq!(bool::try_from_value(val).unwrap(), true);
        assert_eq!(bool::try_from_value(1_i64.as_value()).unwrap(), true);
        assert_eq!(bool::try_from_value(0_u8.as_value()).unwrap(), false);
        assert!(bool::try_from_value(0.5_f32.as_value()).is_err());
    }

    #[test]
    fn value_integers() {
        assert_eq!(42_i32.as_value(), Value::Int32(Some(42)));
        assert_eq!(i32::try_from_value(Value::Int8(Some(-3))).unwrap(), -3);
        assert_eq!(i8::try_from_value(Value::UInt8(Some(99))).unwrap(), 99);
        assert_eq!(u64::try_from_value(Value::Int64(Some(7))).unwrap(), 7);
        let error = i8::try_from_value(Value::Int32(Some(1000))).unwrap_err();
        assert!(error.is_invalid_argument());
        let error = u32::try_from_value(Value::Int32(Some(-1))).unwrap_err();
        assert!(error.is_invalid_argument());
    }

    #[test]
    fn value_floats() {
        assert_eq!(1.5_f64.as_value(), Value::Float64(Some(1.5)));
        assert_eq!(f64::try_from_value(Value::Float32(Some(0.5))).unwrap(), 0.5);
        assert_eq!(f32::try_from_value(Value::Float64(Some(0.25))).unwrap(), 0.25);
        assert!(f32::try_from_value(Value::Float64(Some(1e300))).is_err());
        assert!(f64::try_from_value(Value::Int32(Some(1))).is_err());
    }

    #[test]
    fn value_decimal() {
        let d = Decimal::new(12345, 2);
        assert_eq!(d.as_value(), Value::Decimal(Some(d)));
        assert_eq!(Decimal::try_from_value(Value::Int32(Some(7))).unwrap(), Decimal::from(7));
    }

    #[test]
    fn value_text_and_blob() {
        assert_eq!("abc".as_value(), Value::Varchar(Some("abc".into())));
        assert_eq!(
            String::try_from_value(Value::Varchar(Some("x".into()))).unwrap(),
            "x"
        );
        assert!(String::try_from_value(Value::Int32(Some(1))).is_err());
        let blob = vec![1_u8, 2, 3];
        assert_eq!(blob.clone().as_value(), Value::Blob(Some(vec![1, 2, 3].into())));
        assert_eq!(
            Vec::<u8>::try_from_value(Value::Blob(Some(vec![9].into()))).unwrap(),
            vec![9]
        );
    }

    #[test]
    fn value_temporal_and_uuid() {
        let date = date!(2024 - 05 - 17);
        assert_eq!(date.as_value(), Value::Date(Some(date)));
        let at = datetime!(2024-05-17 08:30:00);
        assert_eq!(at.as_value(), Value::Timestamp(Some(at)));
        let t = time!(8:30);
        assert_eq!(t.as_value(), Value::Time(Some(t)));
        let id = Uuid::nil();
        assert_eq!(id.as_value(), Value::Uuid(Some(id)));
        assert_eq!(Uuid::try_from_value(id.as_value()).unwrap(), id);
    }

    #[test]
    fn options_carry_typed_nulls() {
        assert_eq!(Option::<i32>::None.as_value(), Value::Int32(None));
        assert_eq!(Some(5_i32).as_value(), Value::Int32(Some(5)));
        assert_eq!(Option::<i32>::try_from_value(Value::Int32(None)).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<i32>::try_from_value(Value::Int32(Some(5))).unwrap(),
            Some(5)
        );
        // A NULL cannot decode into a plain primitive
        let error = i32::try_from_value(Value::Int32(None)).unwrap_err();
        assert!(error.is_invalid_argument());
    }

    #[test]
    fn shared_and_borrowed_wrappers_convert() {
        use std::{borrow::Cow, rc::Rc, sync::Arc};
        assert_eq!(
            Cow::Borrowed("abc").as_value(),
            Value::Varchar(Some("abc".into()))
        );
        assert_eq!(
            Cow::<str>::try_from_value(Value::Varchar(Some("x".into()))).unwrap(),
            "x"
        );
        assert_eq!(Rc::new(5_i32).as_value(), Value::Int32(Some(5)));
        assert_eq!(Arc::new(5_i32).as_value(), Value::Int32(Some(5)));
        assert_eq!(Box::new(5_i32).as_value(), Value::Int32(Some(5)));
        assert_eq!(Rc::<i32>::try_from_value(Value::Int32(Some(7))).unwrap(), 7.into());
    }

    #[test]
    fn null_detection() {
        assert!(Value::Null.is_null());
        assert!(Value::Varchar(None).is_null());
        assert!(!Value::Varchar(Some("".into())).is_null());
    }

    #[test]
    fn display_renders_literal_previews() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int32(None).to_string(), "NULL");
        assert_eq!(Value::Int32(Some(-5)).to_string(), "-5");
        assert_eq!(Value::Boolean(Some(true)).to_string(), "true");
        assert_eq!(
            Value::Varchar(Some("it's".into())).to_string(),
            "'it''s'"
        );
        assert_eq!(
            Value::Blob(Some(vec![0xAB, 0x01].into())).to_string(),
            "x'ab01'"
        );
        assert_eq!(Value::Float64(Some(1.5)).to_string(), "1.5");
    }
}
