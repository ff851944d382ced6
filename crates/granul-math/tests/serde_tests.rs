// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![cfg(feature = "serde")]
use granul_math::{Matrix3x3, Point3, Vector3};

#[test]
fn kernel_types_serialize_as_flat_arrays() {
    let v = Vector3::new(1.0, -2.0, 0.5);
    assert_eq!(serde_json::to_string(&v).unwrap(), "[1.0,-2.0,0.5]");

    let p = Point3::new(0.0, 1.0, 2.0);
    assert_eq!(serde_json::to_string(&p).unwrap(), "[0.0,1.0,2.0]");

    let m: Matrix3x3 = serde_json::from_str("[1,2,3,4,5,6,7,8,9]").unwrap();
    assert_eq!(m.yz(), 6.0);
}
