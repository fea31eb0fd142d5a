use ironcsv::row::{row2, row3, row5};
use ironcsv::testing::*;
use ironcsv::{CodecRegistry, DecodeError, RowCodec, RowDecoder, RowEncoder, SerdeRowDecoder, cell};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
struct Order {
    id: u64,
    customer: String,
    quantity: u32,
    price: f64,
    note: Option<String>,
}

fn order_codec() -> RowCodec<Order> {
    row5(
        cell::u64(),
        cell::string(),
        cell::u32(),
        cell::f64(),
        cell::option(cell::string()),
    )
    .imap(
        |(id, customer, quantity, price, note)| Order {
            id,
            customer,
            quantity,
            price,
            note,
        },
        |o: &Order| (o.id, o.customer.clone(), o.quantity, o.price, o.note.clone()),
    )
}

fn fields(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn struct_row_round_trip() {
    assert_row_round_trip(
        &order_codec(),
        &[
            Order {
                id: 1,
                customer: "ACME, Inc.".into(),
                quantity: 3,
                price: 9.99,
                note: None,
            },
            Order {
                id: u64::MAX,
                customer: String::new(),
                quantity: 0,
                price: -0.5,
                note: Some("rush".into()),
            },
        ],
    );
}

#[test]
fn encode_width_matches_decode_width() {
    let codec = order_codec();
    let order = Order {
        id: 7,
        customer: "x".into(),
        quantity: 1,
        price: 1.0,
        note: None,
    };
    let encoded = codec.encode_row(&order);
    assert_eq!(encoded.len(), 5);
    assert_eq!(codec.clone().strict().decode_row(&encoded), Ok(order));
}

#[test]
fn first_failing_column_is_reported() {
    let err = assert_row_decode_fails(&order_codec(), &["1", "bob", "many", "oops", ""]);
    assert_eq!(err.column(), Some(2));
    assert!(matches!(
        err.root_cause(),
        DecodeError::Parse { target: "u32", .. }
    ));
}

#[test]
fn short_row_fails_at_first_missing_column() {
    let err = assert_row_decode_fails(&order_codec(), &["1", "bob"]);
    assert_eq!(
        err,
        DecodeError::Column {
            index: 2,
            source: Box::new(DecodeError::IndexOutOfBounds { index: 2, len: 2 }),
        }
    );
}

#[test]
fn fixed_arity_sequence() {
    let rgb = RowCodec::array::<3>(cell::u8());
    assert_row_round_trip(&rgb, &[[0, 128, 255], [1, 1, 1]]);
    let encoded = rgb.encode_row(&[9, 8, 7]);
    assert_eq!(encoded, fields(&["9", "8", "7"]));
    assert_eq!(rgb.clone().strict().decode_row(&encoded), Ok([9, 8, 7]));
    assert_eq!(
        rgb.decode_row(&fields(&["1", "2"])),
        Err(DecodeError::Arity {
            expected: 3,
            found: 2
        })
    );
    assert_eq!(rgb.decode_row(&[]), Err(DecodeError::EmptyRow));
}

#[test]
fn header_then_variable_tail() {
    let codec = row2(cell::string(), RowCodec::list(cell::i32(), 0));
    assert_row_round_trip(
        &codec,
        &[
            ("empty".to_string(), vec![]),
            ("some".to_string(), vec![1, -2, 3]),
        ],
    );
}

#[test]
fn nested_rows_share_one_offset() {
    let point = row2(cell::f64(), cell::f64());
    let labelled = row3(cell::string(), point.clone(), point);
    let value = ("seg".to_string(), (0.0, 1.0), (2.5, -3.0));
    let encoded = labelled.encode_row(&value);
    assert_eq!(encoded, fields(&["seg", "0", "1", "2.5", "-3"]));
    assert_eq!(labelled.decode_row(&encoded), Ok(value));

    let err = assert_row_decode_fails(&labelled, &["seg", "0", "1", "2.5", "east"]);
    assert_eq!(err.column(), Some(4));
}

#[test]
fn skipped_columns_are_ignored() {
    let codec = row3(cell::u8(), RowCodec::skip(2), cell::char())
        .imap(|(n, (), c)| (n, c), |&(n, c): &(u8, char)| (n, (), c));
    assert_eq!(codec.decode_row(&fields(&["4", "junk", "", "z"])), Ok((4, 'z')));
    assert_eq!(codec.encode_row(&(4, 'z')), fields(&["4", "", "", "z"]));
}

#[test]
fn serde_bridge_reads_derived_structs() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Line {
        sku: String,
        qty: u32,
        discount: Option<f64>,
    }

    let positional = SerdeRowDecoder::<Line>::new();
    assert_eq!(
        positional.decode_row(&fields(&["A-1", "2", ""])),
        Ok(Line {
            sku: "A-1".into(),
            qty: 2,
            discount: None
        })
    );

    let named = SerdeRowDecoder::<Line>::new().with_header(["qty", "discount", "sku"]);
    assert_eq!(
        named.decode_row(&fields(&["5", "0.1", "B-2"])),
        Ok(Line {
            sku: "B-2".into(),
            qty: 5,
            discount: Some(0.1)
        })
    );

    let err = positional.decode_row(&fields(&["A-1", "two", ""])).unwrap_err();
    assert_eq!(err.column(), Some(1));
}

#[test]
fn registry_supplies_row_codecs_by_type() -> anyhow::Result<()> {
    let mut registry = CodecRegistry::with_defaults();
    registry.register_row(order_codec());

    let codec = registry.require_row::<Order>()?;
    let order = codec.decode_row(&fields(&["3", "c", "1", "2", "n"]))?;
    assert_eq!(order.note.as_deref(), Some("n"));

    let single = registry.require_row::<f32>()?;
    assert_eq!(single.decode_row(&fields(&["0.25"])), Ok(0.25));

    assert!(registry.require_row::<Vec<u8>>().is_err());
    Ok(())
}
