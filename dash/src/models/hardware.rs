//! Resource shapes a deployment can request

/// Compute resources backing one shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeResource {
    pub cpu: u32,
    /// Memory in MiB
    pub memory: u32,
    pub ephemeral_storage_gb: u32,
    pub accelerator_type: Option<&'static str>,
    pub accelerator_num: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareShape {
    pub name: &'static str,
    pub description: &'static str,
    /// Offered when creating a deployment
    pub selectable: bool,
    pub resource: ShapeResource,
}

const fn cpu_shape(
    name: &'static str,
    description: &'static str,
    cpu: u32,
    memory: u32,
    ephemeral_storage_gb: u32,
) -> HardwareShape {
    HardwareShape {
        name,
        description,
        selectable: true,
        resource: ShapeResource {
            cpu,
            memory,
            ephemeral_storage_gb,
            accelerator_type: None,
            accelerator_num: 0,
        },
    }
}

const A10_RESOURCE: ShapeResource = ShapeResource {
    cpu: 8,
    memory: 32768,
    ephemeral_storage_gb: 400,
    accelerator_type: Some("NVIDIA-A10"),
    accelerator_num: 1,
};

pub const HARDWARE_SHAPES: &[HardwareShape] = &[
    cpu_shape(
        "cpu.small",
        "General purpose small shape with 1 CPUs, 4GB of RAM and 16GB of ephemeral storage",
        1,
        4096,
        16,
    ),
    cpu_shape(
        "cpu.medium",
        "General purpose medium shape with 2 CPUs, 8GB of RAM and 32GB of ephemeral storage",
        2,
        8192,
        32,
    ),
    cpu_shape(
        "cpu.large",
        "General purpose large shape with 4 CPUs, 16GB of RAM and 64GB of ephemeral storage",
        4,
        16384,
        64,
    ),
    HardwareShape {
        name: "gpu.t4",
        description: "Accelerated computing shape with 1 16GB T4 GPU, 4 CPUs, 16GB of RAM and 100GB of ephemeral storage",
        selectable: true,
        resource: ShapeResource {
            cpu: 4,
            memory: 16384,
            ephemeral_storage_gb: 100,
            accelerator_type: Some("Tesla-T4"),
            accelerator_num: 1,
        },
    },
    HardwareShape {
        name: "gpu.a10",
        description: "Accelerated computing shape with 1 24GB A10 GPU, 8 CPUs, 32GB of RAM and 400GB of ephemeral storage",
        selectable: true,
        resource: A10_RESOURCE,
    },
    HardwareShape {
        name: "ac1.a10",
        description: "Accelerated computing shape with 1 24GB A10 GPU, 8 CPUs, 32GB of RAM and 400GB of ephemeral storage",
        selectable: false,
        resource: A10_RESOURCE,
    },
];

pub fn find_shape(name: &str) -> Option<&'static HardwareShape> {
    HARDWARE_SHAPES.iter().find(|s| s.name == name)
}

/// Names of the shapes offered for new deployments, in catalog order
pub fn selectable_shapes() -> Vec<&'static str> {
    HARDWARE_SHAPES
        .iter()
        .filter(|s| s.selectable)
        .map(|s| s.name)
        .collect()
}

pub fn is_gpu_instance(shape: Option<&str>) -> bool {
    shape
        .and_then(find_shape)
        .is_some_and(|s| s.resource.accelerator_type.is_some())
}
