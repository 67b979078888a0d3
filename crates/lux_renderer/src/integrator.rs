//! Light transport: a recursive Whitted tracer and a Monte Carlo path tracer.
//!
//! Both walk the scene through [`Scene::find_intersection`] and return linear
//! RGB radiance. The path tracer draws all of its randomness from the RNG it
//! is handed, so results are reproducible per seed.

use std::f64::consts::PI;

use lux_core::MaterialKind;
use lux_math::{DVec3, Ray};
use rand::{Rng, RngCore};

use crate::scene::Scene;

/// Radiance of rays that leave the scene.
pub const BACKGROUND: DVec3 = DVec3::new(0.2, 0.7, 0.8);

/// Offset applied along the normal to secondary ray origins.
const SURFACE_EPSILON: f64 = 1e-3;

/// Bounces allowed past `max_recursion` before a path is cut off, whatever
/// Russian roulette decides. Colors with a component at or above one always
/// survive the roulette.
pub const ROULETTE_DEPTH: u32 = 64;

/// Mirror `incident` about `normal`.
#[inline]
pub fn reflect(incident: DVec3, normal: DVec3) -> DVec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Refract `incident` through a surface with the given refractive index.
///
/// The side is inferred from the sign of `incident · normal`: a positive dot
/// means the ray is leaving the medium. Returns [`DVec3::ZERO`] on total
/// internal reflection.
pub fn refract(incident: DVec3, normal: DVec3, refractive_index: f64) -> DVec3 {
    let mut cos_i = -incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t, mut n) = (1.0, refractive_index, normal);

    if cos_i < 0.0 {
        cos_i = -cos_i;
        std::mem::swap(&mut eta_i, &mut eta_t);
        n = -normal;
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        DVec3::ZERO
    } else {
        incident * eta + n * (eta * cos_i - k.sqrt())
    }
}

/// Move `point` off the surface to the side `direction` leaves towards.
#[inline]
fn offset_origin(point: DVec3, normal: DVec3, direction: DVec3) -> DVec3 {
    if direction.dot(normal) < 0.0 {
        point - normal * SURFACE_EPSILON
    } else {
        point + normal * SURFACE_EPSILON
    }
}

/// Whitted-style recursive ray tracing with Phong lighting and hard shadows.
///
/// Reflection and refraction are always traced, weighted by the material's
/// albedo. Rays past `max_recursion` see the background.
pub fn render_ray(scene: &Scene, ray: &Ray, recursion: u32, max_recursion: u32) -> DVec3 {
    if recursion > max_recursion {
        return BACKGROUND;
    }
    let Some(hit) = scene.find_intersection(ray) else {
        return BACKGROUND;
    };

    let material = hit.material;
    let direction = ray.direction();

    let reflect_dir = reflect(direction, hit.normal).normalize_or_zero();
    let refract_dir = refract(direction, hit.normal, material.refractive_index).normalize_or_zero();

    let reflect_color = render_ray(
        scene,
        &Ray::new(offset_origin(hit.point, hit.normal, reflect_dir), reflect_dir),
        recursion + 1,
        max_recursion,
    );
    // A total internal reflection leaves a zero direction, which misses everything
    let refract_color = render_ray(
        scene,
        &Ray::new(offset_origin(hit.point, hit.normal, refract_dir), refract_dir),
        recursion + 1,
        max_recursion,
    );

    let mut diffuse_intensity = 0.0;
    let mut specular_intensity = 0.0;

    for light in scene.lights() {
        let to_light = light.position - hit.point;
        let light_distance = to_light.length();
        let light_dir = to_light / light_distance;

        let shadow_origin = offset_origin(hit.point, hit.normal, light_dir);
        if let Some(occluder) = scene.find_intersection(&Ray::new(shadow_origin, light_dir)) {
            if (occluder.point - shadow_origin).length() < light_distance {
                continue;
            }
        }

        diffuse_intensity += light.intensity * light_dir.dot(hit.normal).max(0.0);
        specular_intensity += (-reflect(-light_dir, hit.normal))
            .dot(direction)
            .max(0.0)
            .powf(material.specular_exponent)
            * light.intensity;
    }

    let albedo = material.albedo;
    material.diffuse_color * diffuse_intensity * albedo.x
        + DVec3::ONE * specular_intensity * albedo.y
        + reflect_color * albedo.z
        + refract_color * albedo.w
}

/// Probabilistic path termination.
///
/// Survives with probability equal to the largest component of `color` and
/// returns the color rescaled by that probability, keeping the estimate
/// unbiased. A black color never survives.
pub fn russian_roulette(color: DVec3, rng: &mut dyn RngCore) -> Option<DVec3> {
    let p = color.max_element();
    (rng.gen::<f64>() < p).then(|| color / p)
}

/// Split of energy at a dielectric boundary.
#[derive(Debug, Clone, Copy)]
pub struct Fresnel {
    /// Schlick reflectance
    pub reflectance: f64,
    /// `1 - reflectance`
    pub transmittance: f64,
    /// Unit direction of the transmitted ray
    pub refracted: DVec3,
}

/// Schlick's approximation for a ray with unit `direction` hitting a
/// surface with outward `normal`.
///
/// Returns `None` on total internal reflection.
pub fn fresnel(direction: DVec3, normal: DVec3, refractive_index: f64) -> Option<Fresnel> {
    let facing = if normal.dot(direction) < 0.0 {
        normal
    } else {
        -normal
    };
    let into = normal.dot(facing) > 0.0;

    let (nc, nt) = (1.0, refractive_index);
    let nnt = if into { nc / nt } else { nt / nc };
    let ddn = direction.dot(facing);
    let cos2t = 1.0 - nnt * nnt * (1.0 - ddn * ddn);
    if cos2t < 0.0 {
        return None;
    }

    let sign = if into { 1.0 } else { -1.0 };
    let refracted = (direction * nnt - normal * (sign * (ddn * nnt + cos2t.sqrt()))).normalize();

    let a = nt - nc;
    let b = nt + nc;
    let r0 = a * a / (b * b);
    let c = 1.0 - if into { -ddn } else { refracted.dot(normal) };
    let reflectance = r0 + (1.0 - r0) * c.powi(5);

    Some(Fresnel {
        reflectance,
        transmittance: 1.0 - reflectance,
        refracted,
    })
}

/// Cosine-weighted direction in the hemisphere around unit `normal`.
fn cosine_hemisphere(normal: DVec3, rng: &mut dyn RngCore) -> DVec3 {
    let r1 = 2.0 * PI * rng.gen::<f64>();
    let r2 = rng.gen::<f64>();
    let r2s = r2.sqrt();

    let w = normal;
    let axis = if w.x.abs() > 0.1 { DVec3::Y } else { DVec3::X };
    let u = axis.cross(w).normalize();
    let v = w.cross(u);

    (u * r1.cos() * r2s + v * r1.sin() * r2s + w * (1.0 - r2).sqrt()).normalize()
}

/// Monte Carlo path tracing.
///
/// Paths deeper than `max_recursion` continue only through Russian roulette,
/// and return the surface emission once they reach `max_recursion` plus
/// [`ROULETTE_DEPTH`].
/// Diffuse surfaces scatter into a cosine-weighted hemisphere, specular ones
/// reflect, and refractive ones split by Fresnel reflectance (both branches
/// for the first two bounces, one chosen at random after that).
pub fn render_path(
    scene: &Scene,
    ray: &Ray,
    recursion: u32,
    max_recursion: u32,
    rng: &mut dyn RngCore,
) -> DVec3 {
    let Some(hit) = scene.find_intersection(ray) else {
        return BACKGROUND;
    };

    let material = hit.material;
    let mut color = material.diffuse_color;

    if recursion > max_recursion {
        if recursion >= max_recursion.saturating_add(ROULETTE_DEPTH) {
            return material.emission;
        }
        match russian_roulette(color, rng) {
            Some(scaled) => color = scaled,
            None => return material.emission,
        }
    }

    let direction = ray.direction();
    let normal = hit.normal;
    let next = recursion + 1;

    match material.kind {
        MaterialKind::Diffuse => {
            let facing = if normal.dot(direction) < 0.0 {
                normal
            } else {
                -normal
            };
            let bounce = cosine_hemisphere(facing, rng);
            let origin = hit.point + facing * SURFACE_EPSILON;

            material.emission
                + color * render_path(scene, &Ray::new(origin, bounce), next, max_recursion, rng)
        }
        MaterialKind::Specular => {
            let reflected = reflect(direction, normal).normalize_or_zero();
            let origin = offset_origin(hit.point, normal, reflected);

            material.emission
                + color * render_path(scene, &Ray::new(origin, reflected), next, max_recursion, rng)
        }
        MaterialKind::Refractive => {
            let reflected_dir = reflect(direction, normal).normalize_or_zero();
            let reflected = Ray::new(
                offset_origin(hit.point, normal, reflected_dir),
                reflected_dir,
            );

            let Some(split) = fresnel(direction, normal, material.refractive_index) else {
                return material.emission
                    + color * render_path(scene, &reflected, next, max_recursion, rng);
            };

            let refracted = Ray::new(
                offset_origin(hit.point, normal, split.refracted),
                split.refracted,
            );

            let radiance = if recursion <= 1 {
                render_path(scene, &reflected, next, max_recursion, rng) * split.reflectance
                    + render_path(scene, &refracted, next, max_recursion, rng)
                        * split.transmittance
            } else {
                let p = 0.25 + 0.5 * split.reflectance;
                if rng.gen::<f64>() < p {
                    render_path(scene, &reflected, next, max_recursion, rng)
                        * (split.reflectance / p)
                } else {
                    render_path(scene, &refracted, next, max_recursion, rng)
                        * (split.transmittance / (1.0 - p))
                }
            };

            material.emission + color * radiance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Sphere;
    use lux_core::{Material, PointLight};
    use lux_math::DVec4;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn assert_vec_eq(a: DVec3, b: DVec3, tolerance: f64) {
        assert!((a - b).abs().max_element() < tolerance, "{a} != {b}");
    }

    fn single_sphere(material: Material) -> Scene {
        let mut scene = Scene::new();
        scene.add(Sphere::new(
            DVec3::new(0.0, 0.0, -5.0),
            1.0,
            Arc::new(material),
        ));
        scene.add_light(PointLight::new(DVec3::new(0.0, 5.0, 0.0), 1.5));
        scene
    }

    #[test]
    fn test_reflect() {
        let r = reflect(DVec3::new(1.0, -1.0, 0.0), DVec3::Y);
        assert_eq!(r, DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        let d = DVec3::new(0.0, 0.0, -1.0);
        let r = refract(d, DVec3::Z, 1.5);
        assert_vec_eq(r.normalize(), d, 1e-12);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Leaving glass at a grazing angle
        let d = DVec3::new(1.0, 0.0, 0.2).normalize();
        assert_eq!(refract(d, DVec3::Z, 1.5), DVec3::ZERO);
    }

    #[test]
    fn test_render_ray_base_cases() {
        let scene = single_sphere(Material::ivory());
        let towards = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let away = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 1.0));

        assert_eq!(render_ray(&scene, &away, 0, 5), BACKGROUND);
        assert_eq!(render_ray(&scene, &towards, 6, 5), BACKGROUND);
        assert_ne!(render_ray(&scene, &towards, 0, 5), BACKGROUND);
    }

    #[test]
    fn test_render_ray_shading() {
        // Pure diffuse: front of the sphere lit from above and in front
        let material = Material::new("matte", DVec3::new(1.0, 0.5, 0.25))
            .with_albedo(DVec4::new(1.0, 0.0, 0.0, 0.0));
        let scene = single_sphere(material);

        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let color = render_ray(&scene, &ray, 0, 5);

        // Hit (0,0,-4), normal +Z, light direction towards (0,5,0)
        let l = (DVec3::new(0.0, 5.0, 0.0) - DVec3::new(0.0, 0.0, -4.0)).normalize();
        let expected = DVec3::new(1.0, 0.5, 0.25) * 1.5 * l.dot(DVec3::Z);
        assert_vec_eq(color, expected, 1e-9);
    }

    #[test]
    fn test_render_ray_shadowed() {
        let material = Material::new("matte", DVec3::ONE).with_albedo(DVec4::new(1.0, 0.0, 0.0, 0.0));
        let mut scene = single_sphere(material.clone());
        // Occluder between the hit point and the light
        scene.add(Sphere::new(DVec3::new(0.0, 2.5, -2.0), 0.5, Arc::new(material)));

        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        assert_vec_eq(render_ray(&scene, &ray, 0, 5), DVec3::ZERO, 1e-12);
    }

    #[test]
    fn test_zero_direction_ray_sees_background() {
        let scene = single_sphere(Material::glass());
        for origin in [DVec3::ZERO, DVec3::new(0.0, 0.0, -5.0), DVec3::new(0.0, 0.0, -4.0)] {
            let ray = Ray::new(origin, DVec3::ZERO);
            assert_eq!(render_ray(&scene, &ray, 0, 5), BACKGROUND);
        }
    }

    #[test]
    fn test_fresnel_energy_conserved() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let direction = DVec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
            .normalize_or_zero();
            if direction == DVec3::ZERO {
                continue;
            }
            let index = rng.gen_range(1.0..2.5);
            if let Some(f) = fresnel(direction, DVec3::Y, index) {
                assert!((f.reflectance + f.transmittance - 1.0).abs() < 1e-12);
                assert!((0.0..=1.0).contains(&f.reflectance));
                assert!((f.refracted.length() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_fresnel_total_internal_reflection() {
        // Inside the medium, grazing the surface
        let direction = DVec3::new(1.0, 0.1, 0.0).normalize();
        assert!(fresnel(direction, DVec3::Y, 1.5).is_none());
        // Entering never reflects totally
        assert!(fresnel(-direction, DVec3::Y, 1.5).is_some());
    }

    #[test]
    fn test_russian_roulette_unbiased() {
        let mut rng = StdRng::seed_from_u64(42);
        let color = DVec3::new(0.2, 0.5, 0.1);
        let trials = 200_000;

        let sum = (0..trials)
            .filter_map(|_| russian_roulette(color, &mut rng))
            .fold(DVec3::ZERO, |acc, c| acc + c);
        assert_vec_eq(sum / trials as f64, color, 0.01);
    }

    #[test]
    fn test_russian_roulette_black_never_survives() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!((0..1000).all(|_| russian_roulette(DVec3::ZERO, &mut rng).is_none()));
    }

    #[test]
    fn test_cosine_hemisphere_above_surface() {
        let mut rng = StdRng::seed_from_u64(42);
        for normal in [DVec3::Y, DVec3::X, DVec3::new(1.0, 1.0, -1.0).normalize()] {
            for _ in 0..200 {
                let d = cosine_hemisphere(normal, &mut rng);
                assert!(d.dot(normal) >= 0.0);
                assert!((d.length() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_dark_closed_room_is_black() {
        // Camera inside a non-emissive sphere: no path ever escapes or finds light
        let mut scene = Scene::new();
        scene.add(Sphere::new(DVec3::ZERO, 10.0, Arc::new(Material::ivory())));

        let mut rng = StdRng::seed_from_u64(42);
        let mut total = DVec3::ZERO;
        for _ in 0..200 {
            let ray = Ray::new(DVec3::ZERO, DVec3::new(0.3, -0.2, -1.0).normalize());
            total += render_path(&scene, &ray, 0, 5, &mut rng);
        }
        assert_eq!(total, DVec3::ZERO);
    }

    #[test]
    fn test_mirror_enclosure_terminates() {
        let mut scene = Scene::new();
        scene.add(Sphere::new(DVec3::ZERO, 10.0, Arc::new(Material::mirror())));

        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.3, -0.2, -1.0).normalize());
        assert_eq!(render_path(&scene, &ray, 0, 5, &mut rng), DVec3::ZERO);
    }

    #[test]
    fn test_white_enclosure_terminates_at_any_limit() {
        let mut white = Material::ivory();
        white.diffuse_color = DVec3::ONE;
        let mut scene = Scene::new();
        scene.add(Sphere::new(DVec3::ZERO, 10.0, Arc::new(white)));

        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(render_path(&scene, &ray, 0, 0, &mut rng), DVec3::ZERO);
        assert_eq!(render_path(&scene, &ray, u32::MAX - 1, u32::MAX - 1, &mut rng), DVec3::ZERO);
    }

    #[test]
    fn test_render_path_sees_emission() {
        let mut scene = Scene::new();
        scene.add(Sphere::new(DVec3::ZERO, 10.0, Arc::new(Material::light(2.0))));

        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let color = render_path(&scene, &ray, 0, 5, &mut rng);
        assert!(color.min_element() >= 2.0);
    }

    #[test]
    fn test_render_path_miss() {
        let scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        assert_eq!(render_path(&scene, &ray, 0, 5, &mut rng), BACKGROUND);
    }
}
