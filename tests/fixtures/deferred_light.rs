// DO NOT EDIT
// This file was generated by the shader compiler from `deferred_light`

#[allow(clippy::all, dead_code, non_camel_case_types, non_snake_case)]
pub mod shaders {
    use shader_variants::{
        CompilerConfig, CompilerConfigBuilder, ShaderType, UnknownVariantError,
    };

    // QUALITY=2
    pub const DEFERRED_LIGHT__8672040623285480826: [u32; 9] = [
        0x07230203, 0x00010500, 0x00000001, 0x00000002, 0x00000003, 0x00000004, 0x00000005, 0x00000006,
        0x00000007,
    ];
    pub const DEFERRED_LIGHT__8672040623285480826_SIZE: usize = 9;

    // QUALITY=2, USE_SHADOWS=1
    pub const DEFERRED_LIGHT__11529216785969703029: [u32; 3] = [
        0x07230203, 0x00010500, 0xdeadbeef,
    ];
    pub const DEFERRED_LIGHT__11529216785969703029_SIZE: usize = 3;

    pub mod deferred_light {
        /// Used to represent poorly reflected types.
        pub type UnknownType = u32;

        #[derive(Clone, Copy, Debug)]
        #[repr(C)]
        pub struct Light {
            pub position: [f32; 3],
            pub radius: f32,
        }

        #[derive(Clone, Copy, Debug)]
        #[repr(C)]
        pub struct Material {
            pub light: Light,
            pub model: [[f32; 4]; 4],
            pub tints: [[f32; 4]; 2],
            pub flags: u32,
            pub shadow: UnknownType,
        }
    }

    #[derive(Clone, Copy, Debug, Default)]
    pub struct DeferredLight;

    impl DeferredLight {
        /// Stage, entry point and base defines; add variant defines to select a variant.
        pub fn config(&self) -> CompilerConfigBuilder {
            CompilerConfig::new(ShaderType::Fragment)
                .entry_point("main")
                .define("QUALITY", "2")
        }

        pub fn get_variant(
            &self,
            variant: &CompilerConfig,
        ) -> Result<&'static [u32], UnknownVariantError> {
            match variant.hash() {
                8672040623285480826 => Ok(&DEFERRED_LIGHT__8672040623285480826),
                11529216785969703029 => Ok(&DEFERRED_LIGHT__11529216785969703029),
                hash => Err(UnknownVariantError { hash }),
            }
        }
    }
}
