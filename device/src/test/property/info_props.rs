use proptest::prelude::*;

use crate::{DeviceInfo, DeviceType};

fn device_type() -> impl Strategy<Value = DeviceType> {
    prop_oneof![Just(DeviceType::Gpu), Just(DeviceType::Cpu), Just(DeviceType::Custom)]
}

fn device_info() -> impl Strategy<Value = DeviceInfo> {
    (1usize..4096, prop::collection::vec(1usize..128, 1..5), 0usize..1 << 20, device_type())
        .prop_map(|(wgs, sgs, slm, ty)| DeviceInfo::new(wgs, sgs, slm, ty))
}

proptest! {
    #[test]
    fn text_form_round_trips(info in device_info()) {
        let text = info.to_string();
        let parsed: DeviceInfo = text.parse().unwrap();
        prop_assert_eq!(parsed, info, "{}", text);
    }

    #[test]
    fn blanks_are_ignored(info in device_info()) {
        let spaced = info.to_string().replace(',', " , ").replace('{', "{ ");
        let parsed: DeviceInfo = spaced.parse().unwrap();
        prop_assert_eq!(parsed, info, "{}", spaced);
    }
}
