//! Integration tests for hairguide-types.

use hairguide_types::constants::*;
use hairguide_types::{HairError, LayerId, TriangleId};

// ─── Id Tests ─────────────────────────────────────────────────

#[test]
fn triangle_id_index() {
    assert_eq!(TriangleId(42).index(), 42);
    assert_eq!(TriangleId::from(7u32), TriangleId(7));
}

#[test]
fn triangle_id_signed_round_trip() {
    assert_eq!(TriangleId::from_signed(-1), None);
    assert_eq!(TriangleId::from_signed(5), Some(TriangleId(5)));
    assert_eq!(TriangleId::to_signed(None), -1);
    assert_eq!(TriangleId::to_signed(Some(TriangleId(9))), 9);
}

#[test]
fn layer_id_default() {
    assert_eq!(LayerId::default(), LayerId::DEFAULT);
    assert_eq!(LayerId(3).index(), 3);
}

#[test]
fn ids_serialize_transparently_enough() {
    let json = serde_json::to_string(&TriangleId(3)).unwrap();
    let back: TriangleId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, TriangleId(3));
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_messages() {
    let e = HairError::InvalidBinding {
        triangle: 12,
        triangle_count: 4,
    };
    assert!(e.to_string().contains("triangle 12"));

    let e = HairError::Parse {
        line: 3,
        message: "bad float".into(),
    };
    assert_eq!(e.to_string(), "Parse error at line 3: bad float");
}

#[test]
fn io_error_converts() {
    fn fails() -> hairguide_types::HairResult<()> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
        Ok(())
    }
    assert!(matches!(fails(), Err(HairError::Io(_))));
}

// ─── Constant Tests ───────────────────────────────────────────

#[test]
fn timestep_constants_are_consistent() {
    assert!(FIXED_DT < MAX_FRAME_DT);
    assert!(MAX_FRAME_DT <= FIXED_DT * MAX_STEPS_PER_FRAME as f32 + 1e-6);
    assert!(MIN_CURVE_STEPS < MAX_CURVE_STEPS);
    assert!(MIN_SOLVER_ITERATIONS < MAX_SOLVER_ITERATIONS);
}
