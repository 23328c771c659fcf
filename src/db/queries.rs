pub const INSERT_ALERT: &str = r#"
INSERT INTO alertas (id, sensor_id, tipo, descripcion, severidad, ciudad, pais, detalles, fecha, fuente, estado)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11);
"#;

pub const SELECT_ALERT_COLUMNS: &str = r#"
SELECT id, sensor_id, tipo, descripcion, severidad, ciudad, pais, detalles, fecha, fuente, estado
FROM alertas
"#;

pub const SELECT_ALL_ALERTS: &str = r#"
SELECT id, sensor_id, tipo, descripcion, severidad, ciudad, pais, detalles, fecha, fuente, estado
FROM alertas ORDER BY fecha;
"#;

pub const SELECT_ALERT_BY_ID: &str = r#"
SELECT id, sensor_id, tipo, descripcion, severidad, ciudad, pais, detalles, fecha, fuente, estado
FROM alertas WHERE id = $1;
"#;

pub const SELECT_ALERTS_BY_ESTADO: &str = r#"
SELECT id, sensor_id, tipo, descripcion, severidad, ciudad, pais, detalles, fecha, fuente, estado
FROM alertas WHERE estado = $1 ORDER BY fecha;
"#;

pub const UPDATE_ALERT: &str = r#"
UPDATE alertas
SET sensor_id = $2,
    tipo = $3,
    descripcion = $4,
    severidad = $5,
    ciudad = $6,
    pais = $7,
    detalles = $8,
    fecha = $9,
    fuente = $10,
    estado = $11
WHERE id = $1;
"#;

pub const DELETE_ALERT: &str = r#"
DELETE FROM alertas WHERE id = $1;
"#;
