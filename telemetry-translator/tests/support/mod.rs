use telemetry_translator::{GroupAggregate, MemberOp, TypedValue};

pub(crate) const TARGET: &str = "dut1";

pub(crate) fn assign(member: &str, group: &str) -> MemberOp {
    MemberOp::Assign {
        member: member.to_string(),
        group: group.to_string(),
    }
}

pub(crate) fn counter(member: &str, field: &str, value: u64) -> MemberOp {
    MemberOp::SetField {
        member: member.to_string(),
        field: field.to_string(),
        value: TypedValue::Uint(value),
    }
}

#[allow(dead_code)]
pub(crate) fn remove(member: &str) -> MemberOp {
    MemberOp::Remove {
        member: member.to_string(),
    }
}

pub(crate) fn total(aggregates: &[GroupAggregate], group: &str, field: &str) -> Option<u64> {
    aggregates
        .iter()
        .rev()
        .find(|aggregate| aggregate.group == group)
        .and_then(|aggregate| aggregate.total(field))
        .and_then(TypedValue::as_u64)
}
