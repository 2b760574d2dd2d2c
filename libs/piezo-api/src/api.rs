#[derive(Debug, Copy, Clone, PartialEq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub(crate) enum Opcode {
    /// arg1=volts(bits) arg2=ramp(bits) arg3=publish_completion arg4=channel
    SetVoltage,
    /// arg1=channel
    Stop,
    /// arg1=channel
    Home,
    /// arg1=channel -> blocking, returns Scalar1(volts bits)
    CurrentVoltage,
    /// arg1=channel arg2=event_opcode arg3=cid
    HookEvents,
}
