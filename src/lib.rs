macro_rules! wrapper_for {
    ($Outer:ty, $Inner:ty) => {
        impl std::ops::Deref for $Outer {
            type Target = $Inner;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$Outer> for $Inner {
            fn from(value: $Outer) -> Self {
                value.0
            }
        }
    };
}

pub mod cube;
pub mod report;
pub mod rotation;
pub mod solver;
